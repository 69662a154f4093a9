use crate::domain::model::ListingRecord;
use crate::utils::error::Result;

/// 取得競品刊登快照的外部協作者 (爬蟲、檔案、測試資料…)
pub trait ListingSource: Send + Sync {
    fn load_listings(&self) -> impl std::future::Future<Output = Result<Vec<ListingRecord>>> + Send;
}

/// 已在記憶體裡的快照
impl ListingSource for Vec<ListingRecord> {
    async fn load_listings(&self) -> Result<Vec<ListingRecord>> {
        Ok(self.clone())
    }
}

/// 只留下與買家同一地區的賣家；`home_region` 為 `None` 時視為已由來源過濾
pub fn domestic_pool(listings: Vec<ListingRecord>, home_region: Option<&str>) -> Vec<ListingRecord> {
    let Some(region) = home_region.map(str::trim).filter(|r| !r.is_empty()) else {
        return listings;
    };

    let before = listings.len();
    let pool: Vec<ListingRecord> = listings
        .into_iter()
        .filter(|listing| listing.seller_region().trim().eq_ignore_ascii_case(region))
        .collect();

    tracing::debug!(
        "Domestic filter '{}': kept {} of {} listings",
        region,
        pool.len(),
        before
    );
    pool
}
