use crate::cli::ValidateArgs;
use crate::config::GeoCacheConfig;
use anyhow::{Context, Result};

pub fn execute(args: &ValidateArgs) -> Result<()> {
    let config = GeoCacheConfig::from_file(&args.path)
        .with_context(|| format!("Invalid configuration '{}'", args.path.display()))?;

    println!("✅ Configuration is valid: {}", args.path.display());
    println!("Service:         {}", config.global.service_name);
    println!("Metrics:         {}", config.global.enable_metrics);
    println!("Log filter:      {}", config.global.log_filter);
    if config.warmup.enabled {
        println!(
            "Warmup:          enabled ({}s timeout, {} sub-region lists, {} locality lists)",
            config.warmup.timeout_seconds,
            config.warmup.region_ids.len(),
            config.warmup.sub_region_ids.len()
        );
    } else {
        println!("Warmup:          disabled");
    }

    Ok(())
}
