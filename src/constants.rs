pub mod limits {

    pub const MIN_YEAR: i32 = 1900;

    pub const MAX_YEAR: i32 = 2030;

    pub const MIN_RATE: f64 = 0.0;

    pub const MAX_RATE: f64 = 10.0;

    pub const DEFAULT_RATE: f64 = 5.0;
}

pub mod server {

    pub const DEFAULT_PORT: u16 = 1234;

    pub const PORT_ENV: &str = "PORT";
}

pub const SEED_FILE: &str = "movies.json";

pub mod metrics {

    pub const HTTP_REQUESTS: &str = "reelbox_http_requests_total";

    pub const HTTP_REQUEST_DURATION: &str = "reelbox_http_request_duration_seconds";

    pub const MOVIES_CREATED: &str = "reelbox_movies_created_total";

    pub const MOVIES_UPDATED: &str = "reelbox_movies_updated_total";

    pub const VALIDATION_FAILURES: &str = "reelbox_movie_validation_failures_total";

    /// Route label for requests no route matched.
    pub const UNKNOWN_ROUTE: &str = "unknown";
}
