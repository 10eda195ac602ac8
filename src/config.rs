use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const HTTP_ADDR: &str = "0.0.0.0:8000";
pub const UDP_ADDR: &str = "127.0.0.1:5000";
pub const ROOT_DIR: &str = ".";

pub const STORAGE_DIR: &str = "storage";
pub const STORE_FILE: &str = "data.json";

pub const INDEX_PAGE: &str = "index.html";
pub const MESSAGE_PAGE: &str = "message.html";
pub const ERROR_PAGE: &str = "error.html";

/// command line args
#[derive(Parser, Debug)]
#[command(version, about = "Serves the site and collects form submissions over UDP", long_about = None)]
pub struct Args {
    /// Address the web server listens on
    #[arg(long, env = "FORM_RELAY_HTTP_ADDR", default_value = HTTP_ADDR)]
    pub http_addr: SocketAddr,

    /// Address the UDP collector binds to
    #[arg(long, env = "FORM_RELAY_UDP_ADDR", default_value = UDP_ADDR)]
    pub udp_addr: SocketAddr,

    /// Directory holding the pages, static files and the storage directory
    #[arg(long, env = "FORM_RELAY_ROOT", default_value = ROOT_DIR)]
    pub root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_addr: SocketAddr,
    pub udp_addr: SocketAddr,
    pub root: PathBuf,
}

impl Config {
    pub fn new(http_addr: SocketAddr, udp_addr: SocketAddr, root: impl Into<PathBuf>) -> Self {
        Self {
            http_addr,
            udp_addr,
            root: root.into(),
        }
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.root.join(STORAGE_DIR)
    }

    pub fn store_path(&self) -> PathBuf {
        self.storage_dir().join(STORE_FILE)
    }

    pub fn page(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Creates the storage directory if it does not exist yet.
    pub fn prepare(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.storage_dir())
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self::new(args.http_addr, args.udp_addr, args.root)
    }
}
