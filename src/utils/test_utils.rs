use crate::core::app::App;
use crate::core::ask_service::ServiceTarget;
use crate::core::config::Config;

pub fn test_target() -> ServiceTarget {
    ServiceTarget {
        endpoint: "https://answers.test/ask".to_string(),
        api_key_header: "x-api-key".to_string(),
        api_key: "test-key".to_string(),
    }
}

pub fn create_test_app() -> App {
    App::new(&Config::default(), reqwest::Client::new(), test_target())
}
