use fractic_server_error::{define_client_error, define_internal_error};

use crate::entities::BatchFileStatus;

// IO-related.
define_client_error!(ReadError, "Error reading file '{path}'.", { path: &str });

// Configuration-related.
define_client_error!(InvalidRon, "Invalid {ron_type} (invalid RON format).", { ron_type: &str });
define_client_error!(InvalidConfig, "Invalid import configuration: {details}.", { details: &str });
define_client_error!(
    InvalidEndpoint,
    "Invalid extraction endpoint: '{endpoint}'. Expected an absolute http(s) URL.",
    { endpoint: &str }
);

// Extraction-related.
define_internal_error!(
    InvalidExtractionResponse,
    "Extraction endpoint returned an unreadable response: {details}.",
    { details: &str }
);

// Batch-related.
define_client_error!(BatchFileNotFound, "No file with id '{id}' in the batch.", { id: &str });
define_client_error!(
    BatchFileBusy,
    "File '{id}' is currently being processed and cannot be retried yet.",
    { id: &str }
);
define_client_error!(
    InvalidStatusTransition,
    "File '{id}' cannot move from {from:?} to {to:?}.",
    { id: &str, from: &BatchFileStatus, to: &BatchFileStatus }
);

// Presentation-related.
define_internal_error!(CsvWriteError, "Error writing {what} as CSV.", { what: &str });
