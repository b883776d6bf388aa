pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

pub const DEFAULT_PROJECT_ROOT: &str = ".";

pub const DEFAULT_OPEN_ANNOUNCED_BUFFERS: bool = true;
