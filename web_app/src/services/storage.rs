use async_trait::async_trait;

#[derive(Clone)]
pub struct StorageHandler {
    pub client: aws_sdk_s3::Client,
    pub bucket: String,
    pub region: String,
}

#[async_trait]
impl crate::services::StorageService for StorageHandler {
    async fn save_pic(&self, path: &str, body: Vec<u8>) -> anyhow::Result<()> {
        let body = aws_sdk_s3::primitives::ByteStream::from(body);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(body)
            .send()
            .await?;

        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, path
        )
    }
}
