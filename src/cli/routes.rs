use crate::model::{AdminLocality, AdminRecord, AdminRegion, AdminSubRegion};
use crate::sync::invalidation::InvalidationRouter;
use crate::transport::MutationKind;
use chrono::Utc;

const KINDS: [MutationKind; 4] = [
    MutationKind::Create,
    MutationKind::Update,
    MutationKind::Activate,
    MutationKind::Deactivate,
];

fn sample_records() -> Vec<AdminRecord> {
    let now = Utc::now();
    vec![
        AdminRegion {
            id: "<id>".to_string(),
            display_name: String::new(),
            is_active: true,
            sort_order: 0,
            sub_region_count: 0,
            created_at: now,
            updated_at: now,
        }
        .into(),
        AdminSubRegion {
            id: "<id>".to_string(),
            display_name: String::new(),
            region_id: "<region_id>".to_string(),
            is_active: true,
            sort_order: 0,
            locality_count: 0,
            created_at: now,
            updated_at: now,
        }
        .into(),
        AdminLocality {
            id: "<id>".to_string(),
            display_name: String::new(),
            sub_region_id: "<sub_region_id>".to_string(),
            is_active: true,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
        .into(),
    ]
}

/// 由路由器本身生成失效表，保证输出与实际行为一致
pub fn render_table() -> String {
    let mut output = format!("{:<24} {}\n", "MUTATION", "EVICTS");
    for record in sample_records() {
        for kind in KINDS {
            let target = match InvalidationRouter::eviction_for(kind, &record) {
                Some(eviction) => eviction.to_string(),
                None => "(none)".to_string(),
            };
            let mutation = format!("{} {}", kind, record.tier());
            output.push_str(&format!("{:<24} {}\n", mutation, target));
        }
    }
    output
}
