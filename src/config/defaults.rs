pub const DEFAULT_BACKEND: &str = "firestore";
pub const DEFAULT_RUST_LOG: &str = "info";
pub const DEFAULT_CREDENTIALS_PATH: &str = "./serviceAccountKey.json";
pub const DEFAULT_DATABASE_URL: &str = "https://unidad-2c48d.firebaseio.com";
pub const DEFAULT_PASSWORD: &str = "password123";
