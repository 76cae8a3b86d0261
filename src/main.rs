use std::path::PathBuf;

fn main() -> cropper::Result<()> {
    env_logger::init();
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    cropper::run_native(path)
}
