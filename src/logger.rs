use crate::image::{resampler::ScaleFactors, Size};

const CONFIG_FILE: &str = "log4rs.yaml";

#[ctor::ctor]
fn init() {
    if let Err(e) = log4rs::init_file(CONFIG_FILE, Default::default()) {
        eprintln!("Logging disabled, unable to load '{}': {}", CONFIG_FILE, e);
    }
}

pub fn log_scale_factors(source: Size, target: Size, factors: &ScaleFactors) {
    log::debug!(
        "Resampling {} to {} with scale factors x = {:.4}, y = {:.4}",
        source,
        target,
        factors.x,
        factors.y
    );
}
