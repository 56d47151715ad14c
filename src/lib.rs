pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod pdf;
pub mod routes;
pub mod state;

pub mod crypto {
    pub mod password;
    pub mod token;
}

pub mod models {
    pub mod holiday_plan;
    pub mod token;
    pub mod user;
}

pub mod repositories {
    pub mod holiday_plan;
    pub mod memory;
    pub mod token;
    pub mod user;
}

pub mod services {
    pub mod auth;
    pub mod holiday_plans;
    pub mod users;
}

pub mod handlers {
    pub mod auth;
    pub mod holiday_plans;
    pub mod users;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod holiday_plan;
    pub mod json;
    pub mod user;
}
