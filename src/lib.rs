use rocket::fs::{relative, FileServer};
use rocket::{routes, Build, Rocket};
use rocket_dyn_templates::Template;

use crate::modules::helpers::handlebars::format_race_type::FormatRaceType;
use crate::routes::convert;

pub mod errors;
pub mod modules;
pub mod routes {
    pub mod convert;
}

/// # build the web server
/// the conversion form, the conversion endpoint and the static files
pub fn rocket() -> Rocket<Build> {
    rocket::build()
        .attach(Template::custom(|engines| {
            engines.handlebars.register_helper("formatRaceType", Box::new(FormatRaceType));
            engines.handlebars.set_strict_mode(true);
        }))
        .mount("/", routes![
            convert::index,
            convert::convert,
        ])
        .mount("/static", FileServer::from(relative!("static")))
}
