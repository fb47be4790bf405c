use crate::loader::DEFAULT_SAMPLE_LEN;
use argh::FromArgs;

// defaults for the server
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(FromArgs, Debug)]
/// Answer questions about images over HTTP.
pub struct ServerArgs {
    /// the host to run the server on
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    pub host: String,

    /// the port to run the server on
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    pub port: u16,

    /// how many requests may be admitted at once (defaults to the number of CPUs)
    #[argh(option, default = "default_max_in_flight()")]
    pub max_in_flight: usize,

    /// maximum number of tokens generated per answer
    #[argh(option, default = "DEFAULT_SAMPLE_LEN")]
    pub sample_len: usize,

    /// maximum size of a request body in bytes
    #[argh(option, default = "DEFAULT_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: usize,
}

impl ServerArgs {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn default_max_in_flight() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
