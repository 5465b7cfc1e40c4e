pub mod dataset_api;

pub mod models {
    pub mod entry;
    pub mod team;
    pub mod rider;
    pub mod funnel;
}

pub mod helpers {
    pub mod category;
    pub mod format;
    pub mod logging;
    pub mod math;
}
