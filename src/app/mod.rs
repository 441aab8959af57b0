pub mod annotation_use_case;
pub mod catalog_use_case;
pub mod fixtures;
pub mod herd_use_case;
pub mod lineage_use_case;
pub mod records;

pub use annotation_use_case::AnnotationUseCase;
pub use catalog_use_case::{CatalogUseCase, GenusFilter};
pub use fixtures::FixtureBundle;
pub use herd_use_case::{DailyMilkTotal, HerdUseCase, NewAnimal};
pub use lineage_use_case::LineageUseCase;
pub use records::FarmRecords;

use crate::storage::Storage;
use std::sync::Arc;

/// All use cases wired to one store. Cheap to clone; handlers take a copy.
#[derive(Clone)]
pub struct FarmServices {
    pub records: FarmRecords,
    pub catalog: CatalogUseCase,
    pub lineage: LineageUseCase,
    pub herd: HerdUseCase,
    pub annotations: AnnotationUseCase,
}

impl FarmServices {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let records = FarmRecords::new(storage);
        Self {
            catalog: CatalogUseCase::new(records.clone()),
            lineage: LineageUseCase::new(records.clone()),
            herd: HerdUseCase::new(records.clone()),
            annotations: AnnotationUseCase::new(records.clone()),
            records,
        }
    }
}
