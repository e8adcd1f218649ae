pub mod limits {

    /// Size of the trending list.
    pub const TRENDING_LIMIT: u64 = 5;

    pub const MAX_POSTER_URL_LEN: usize = 500;

    /// Upsert attempts before a persistent uniqueness conflict is reported.
    pub const MAX_UPSERT_ATTEMPTS: u32 = 5;
}

pub mod cors {

    pub const DEFAULT_FRONTEND_URL: &str = "http://localhost";

    /// Origins accepted in addition to the configured frontend URL.
    pub const ALWAYS_ALLOWED_ORIGINS: &[&str] = &[
        "http://localhost",
        "http://localhost:80",
        "http://localhost:8080",
        "http://localhost:5173",
        "https://*.railway.app",
    ];
}

pub mod env {

    pub const FRONTEND_URL: &str = "FRONTEND_URL";

    pub const DATABASE_URL: &str = "DATABASE_URL";
}
