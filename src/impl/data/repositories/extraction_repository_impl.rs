use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    data::datasources::extraction_api_datasource::{
        ExtractionApiDatasource, ExtractionApiDatasourceImpl,
    },
    domain::repositories::extraction_repository::ExtractionRepository,
    entities::{ExtractionOutcome, FilePayload, ImportConfig},
};

pub(crate) struct ExtractionRepositoryImpl<
    DS = ExtractionApiDatasourceImpl, // Default.
> where
    DS: ExtractionApiDatasource,
{
    datasource: DS,
}

#[async_trait]
impl<DS> ExtractionRepository for ExtractionRepositoryImpl<DS>
where
    DS: ExtractionApiDatasource,
{
    async fn extract(&self, file: &FilePayload) -> Result<ExtractionOutcome, ServerError> {
        self.datasource.post_pdf(file).await?.into_outcome()
    }
}

impl ExtractionRepositoryImpl {
    pub(crate) fn new(config: &ImportConfig) -> Result<Self, ServerError> {
        Ok(ExtractionRepositoryImpl {
            datasource: ExtractionApiDatasourceImpl::new(config)?,
        })
    }
}
