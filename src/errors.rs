use snafu::Snafu;

pub type CustomResult<T> = Result<T, Error>;

/// # crate wide error type
/// every fallible boundary operation (reading, fetching, or parsing the
/// race dataset) reports one of these variants. aggregation itself never
/// fails; missing data degrades to empty or absent results instead.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("race data file does not exist: {path}"))]
    FileDoesNotExistError { path: String },

    #[snafu(display("permission denied reading race data file: {path}"))]
    PermissionDeniedError { path: String },

    #[snafu(display("failed reading race data file {path}: {source}"))]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    #[snafu(display("failed parsing race data: {source}"))]
    ParseError { source: serde_json::Error },

    #[snafu(display("failed fetching race data from {url}: {source}"))]
    FetchError { url: String, source: reqwest::Error },
}
