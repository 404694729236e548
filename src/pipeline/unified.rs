use crate::models::MarketingRecord;

/// Concatenate per-channel outputs into one table ordered by `(date, channel)`.
///
/// The sort is stable, so rows sharing a date and channel keep their source order.
pub fn build_unified<I>(channel_outputs: I) -> Vec<MarketingRecord>
where
    I: IntoIterator<Item = Vec<MarketingRecord>>,
{
    let mut unified: Vec<MarketingRecord> = channel_outputs.into_iter().flatten().collect();
    unified.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.channel.cmp(&b.channel)));
    unified
}
