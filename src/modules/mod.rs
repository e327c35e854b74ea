pub mod table_reader;
pub mod document_renderer;
pub mod archive_packager;
pub mod conversion;

pub mod models {
    pub mod race;
}

pub mod helpers {
    pub mod logging;

    pub mod handlebars {
        pub mod format_race_type;
    }
}
