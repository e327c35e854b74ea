use std::io::Cursor;

use log::{error, info, warn};
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder, Response};
use rocket::{get, post, FromForm, Request};
use rocket_dyn_templates::{context, Template};
use serde::Serialize;

use crate::errors::{CustomResult, Error};
use crate::modules::archive_packager::ARCHIVE_FILE_NAME;
use crate::modules::conversion::{convert_file, ConversionRequest, ConversionState};
use crate::modules::models::race::{RaceSettings, RaceType};

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

const MISSING_INPUT: &str = "Please upload a CSV file, specify duration and event name.";

/// # the conversion form
#[get("/")]
pub fn index() -> Template {
    render_form(&FormValues::default(), "")
}

/// # convert a table into race documents
/// validates the form, runs the conversion and answers with the zip archive.
/// missing input re-renders the form with a message, a failing conversion is a server error.
#[post("/convert", data = "<form>")]
pub async fn convert(form: Form<ConvertFormData<'_>>) -> Result<ConvertResponse, Status> {
    let mut request = ConversionRequest::new();
    request.advance(ConversionState::Validating);

    let form = form.into_inner();
    let values = FormValues::from(&form);

    let (mut file, settings) = match validate(form) {
        Ok(validated) => validated,
        Err(error) => {
            warn!(target:"routes/convert:convert", "rejected conversion: {}", error);
            request.advance(ConversionState::RejectedInput);
            return Ok(ConvertResponse::Rejected(render_form(&values, &error.to_string())));
        }
    };

    request.advance(ConversionState::Converting);

    // the upload lives in its own directory, removed when the request ends
    let workspace = match tempfile::Builder::new().prefix("rac2-upload-").tempdir() {
        Ok(workspace) => workspace,
        Err(error) => {
            error!(target:"routes/convert:convert", "Error creating upload directory: {}", error);
            request.advance(ConversionState::Failed);
            return Err(Status::InternalServerError);
        }
    };
    let upload_path = workspace.path().join("upload.csv");

    if let Err(error) = file.copy_to(&upload_path).await {
        error!(target:"routes/convert:convert", "Error storing upload: {}", error);
        request.advance(ConversionState::Failed);
        return Err(Status::InternalServerError);
    }

    let result = rocket::tokio::task::spawn_blocking(move || convert_file(&upload_path, &settings)).await;

    match result {
        Ok(Ok(archive)) => {
            info!(target:"routes/convert:convert", "serving archive of {} bytes", archive.len());
            request.advance(ConversionState::ReadyForDownload);
            Ok(ConvertResponse::Archive(ArchiveDownload(archive)))
        }
        Ok(Err(error)) => {
            error!(target:"routes/convert:convert", "Error converting table: {}", error);
            request.advance(ConversionState::Failed);
            Err(Status::InternalServerError)
        }
        Err(error) => {
            error!(target:"routes/convert:convert", "Conversion task failed: {}", error);
            request.advance(ConversionState::Failed);
            Err(Status::InternalServerError)
        }
    }
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

#[derive(FromForm)]
pub struct ConvertFormData<'r> {
    pub file: Option<TempFile<'r>>,
    pub duration: Option<u32>,
    pub event_name: Option<String>,
    #[field(name = "type", default = RaceType::Boats)]
    pub race_type: RaceType,
}

/// the values shown in the form, so a rejected submit keeps what the user typed
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FormValues {
    pub duration: u32,
    pub event_name: String,
    pub race_type: RaceType,
}

impl Default for FormValues {
    fn default() -> Self {
        FormValues {
            duration: 1,
            event_name: String::new(),
            race_type: RaceType::default(),
        }
    }
}

impl From<&ConvertFormData<'_>> for FormValues {
    fn from(form: &ConvertFormData<'_>) -> Self {
        FormValues {
            duration: form.duration.unwrap_or(1),
            event_name: form.event_name.clone().unwrap_or_default(),
            race_type: form.race_type,
        }
    }
}

/// # validate the form
/// a file with content, a duration and an event name are required
fn validate(form: ConvertFormData<'_>) -> CustomResult<(TempFile<'_>, RaceSettings)> {
    let ConvertFormData {
        file,
        duration,
        event_name,
        race_type,
    } = form;

    let file = file.filter(|file| file.len() > 0);
    let event_name = event_name.filter(|name| !name.is_empty());

    match (file, duration, event_name) {
        (Some(file), Some(duration), Some(event_name)) => {
            let settings = RaceSettings::new(duration, &event_name, race_type)?;
            Ok((file, settings))
        }
        _ => Err(Error::ValidationError {
            reason: MISSING_INPUT.to_string(),
        }),
    }
}

fn render_form(values: &FormValues, error: &str) -> Template {
    Template::render(
        "index",
        context! {
            error: error,
            duration: values.duration,
            event_name: &values.event_name,
            selected: values.race_type,
            race_types: RaceType::ALL,
        },
    )
}

#[derive(rocket::Responder)]
pub enum ConvertResponse {
    Archive(ArchiveDownload),
    #[response(status = 400)]
    Rejected(Template),
}

/// # zip archive download
/// served as an attachment named `output_files.zip`
pub struct ArchiveDownload(pub Vec<u8>);

impl<'r, 'o: 'r> Responder<'r, 'o> for ArchiveDownload {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'o> {
        Response::build()
            .header(ContentType::ZIP)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{ARCHIVE_FILE_NAME}\""),
            )
            .sized_body(self.0.len(), Cursor::new(self.0))
            .ok()
    }
}
