// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod extraction_api_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod amount_model;
        pub(crate) mod extraction_response_model;
        pub(crate) mod import_config_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod extraction_repository_impl;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod batch_file;
        pub(crate) mod batch_summary;
        pub(crate) mod detected_period;
        pub(crate) mod extraction;
        pub(crate) mod import_config;
    }
    pub(crate) mod logic {
        pub(crate) mod batch_state;
        pub(crate) mod month_detector;
    }
    pub(crate) mod repositories {
        pub(crate) mod extraction_repository;
    }
    pub(crate) mod usecases {
        pub(crate) mod batch_coordinator;
    }
}

pub(crate) mod presentation {
    pub(crate) mod batch_report_printer;
    pub(crate) mod transactions_csv_exporter;
    pub(crate) mod utils;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::batch_file::*;
        pub use crate::domain::entities::batch_summary::*;
        pub use crate::domain::entities::detected_period::*;
        pub use crate::domain::entities::extraction::*;
        pub use crate::domain::entities::import_config::*;
    }

    pub mod detection {
        pub use crate::domain::logic::month_detector::{
            detect_account_type, detect_period, refine_period,
        };
    }

    pub mod repositories {
        pub use crate::domain::repositories::extraction_repository::*;
    }

    pub use crate::domain::usecases::batch_coordinator::BatchCoordinator;
}
