pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod file_export_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod export_row_models;
        pub(crate) mod purchase_payload_model;
    }
}

pub mod domain {
    pub mod entities {
        pub mod android_exception;
        pub mod purchase_info;
        pub mod sku_details;
        pub mod time_bucket;
        pub mod trial_subscription_info;
    }
    pub mod managers {
        pub mod exception_manager;
        pub mod subscription_manager;
    }
    pub mod mappers {
        pub mod purchase_mapper;
    }
}

pub mod config;
pub mod errors;
