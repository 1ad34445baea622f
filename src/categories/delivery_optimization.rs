use super::{program_data, system_root, Category};
use std::path::PathBuf;

pub struct DeliveryOptimization;

impl Category for DeliveryOptimization {
    fn name(&self) -> &'static str {
        "delivery-optimization"
    }

    fn label(&self) -> &'static str {
        "Delivery Optimization"
    }

    fn roots(&self) -> Vec<PathBuf> {
        vec![
            system_root()
                .join("SoftwareDistribution")
                .join("DeliveryOptimization"),
            program_data()
                .join("Microsoft")
                .join("Network")
                .join("Downloader"),
        ]
    }
}
