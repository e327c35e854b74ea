use rocket::{launch, Build, Rocket};

use rac2_builder::modules::helpers::logging::setup_logging;

#[launch]
fn rocket() -> Rocket<Build> {
    setup_logging().expect("Failed to setup logging");

    // start the webserver
    rac2_builder::rocket()
}
