use pipeline_probe_core::contract::StorageListing;

pub trait ObjectLister {
    fn list(&self, bucket: &str) -> Result<StorageListing, String>;
}
