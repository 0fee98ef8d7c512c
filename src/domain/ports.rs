use crate::domain::model::LookupResult;
use crate::utils::error::Result;
use async_trait::async_trait;

/// One remote price lookup. The return type encodes success or failure per
/// code; implementations must never raise past this boundary.
#[async_trait]
pub trait PriceLookup: Send + Sync {
    async fn lookup(&self, code: &str) -> LookupResult;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn concurrency(&self) -> usize;
    fn port(&self) -> u16;
    fn output_path(&self) -> &str;
}
