use rocket_dyn_templates::handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
};

use crate::modules::models::race::RaceType;

/// # race type formatting helper
/// the label shown for a race type in the type selector
///
/// ### usage
/// ```handlebars
/// {{formatRaceType "boats"}}
/// {{formatRaceType "bikes"}}
/// ```
///
/// ### output
/// ```text
/// Boats (rowing)
/// Bikes
/// ```
#[derive(Clone, Copy)]
pub struct FormatRaceType;

impl HelperDef for FormatRaceType {
    fn call<'reg: 'rc, 'rc>(
        &self,
        helper: &Helper,
        _: &Handlebars,
        _: &Context,
        _: &mut RenderContext,
        out: &mut dyn Output,
    ) -> HelperResult {
        check_param_count(helper, 1)?;

        let race_type: RaceType = match helper.param(0) {
            Some(param) => serde_json::from_value(param.value().clone())
                .map_err(|_| RenderError::new(format!("unknown race type {}", param.value())))?,
            None => return Ok(()),
        };

        out.write(label(race_type))?;

        Ok(())
    }
}

fn label(race_type: RaceType) -> &'static str {
    match race_type {
        RaceType::Boats => "Boats (rowing)",
        RaceType::Bikes => "Bikes",
    }
}

pub fn check_param_count(h: &Helper, n: u64) -> Result<(), RenderError> {
    if h.params().len() != n as usize {
        return Err(RenderError::new(format!(
            "Wrong number of arguments for helper \"{}\", {n} was expected but {} were given",
            h.name(),
            h.params().len()
        )));
    }

    Ok(())
}
