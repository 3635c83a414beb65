use mongodb::error::Error as MongoError;
use thiserror::Error;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures of the MongoDB roster backend, each keeping the driver error as source.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("invalid MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("could not build a MongoDB client")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB did not answer {attempts} ping(s) while connecting")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB stopped answering pings")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("could not read the roster document")]
    LoadRoster {
        #[source]
        source: MongoError,
    },
    #[error("could not write the roster document")]
    SaveRoster {
        #[source]
        source: MongoError,
    },
}
