use std::path::{Path, PathBuf};

/// Fresh empty directory under the system temp dir.
pub fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("form-relay-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub const INDEX_HTML: &str = "<html><body><h1>Home</h1></body></html>\n";
pub const MESSAGE_HTML: &str = "<html><body><form method=\"post\" action=\"/message\"></form></body></html>\n";
pub const ERROR_HTML: &str = "<html><body><h1>404</h1></body></html>\n";

/// Scratch site root holding the three fixed pages and a `storage` directory.
pub fn site_dir() -> PathBuf {
    let dir = scratch_dir();
    write(&dir, "index.html", INDEX_HTML);
    write(&dir, "message.html", MESSAGE_HTML);
    write(&dir, "error.html", ERROR_HTML);
    std::fs::create_dir_all(dir.join("storage")).unwrap();
    dir
}

pub fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
