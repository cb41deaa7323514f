use std::env;
use std::path::Path;
use std::process;

use log::error;

use transfercurve::configuration::Configuration;
use transfercurve::editor::curveeditsession::CurveEditSession;

fn main() {
    env_logger::init();

    let config = Configuration::new();
    if let Some(config_path) = env::args().nth(1) {
        if let Err(err) = config.from_reader(Path::new(&config_path)) {
            error!("cannot load configuration '{}': {}", config_path, err);
            process::exit(1);
        }
    }

    let session = match CurveEditSession::from_configuration(&config) {
        Ok(session) => session,
        Err(err) => {
            error!("cannot start edit session: {}", err);
            process::exit(1);
        }
    };

    let sample_count = session.settings().sample_count;
    for (i, value) in session.sample().iter().enumerate() {
        let t = if sample_count == 0 { 0.0 } else { i as f64 / sample_count as f64 };
        println!("{:.6}, {:.6}", t, value);
    }
}
