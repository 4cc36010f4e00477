use pt_http::riot::MAX_PAGE_SIZE;
use pt_http::MatchId;
use pt_http::Result;
use pt_http::RiotClient;
use tracing::debug;

/// Full match history of a player, most recent first
///
/// Pages are requested at `start = 0, page_size, 2 * page_size, ...` until a
/// page shorter than `page_size` comes back. `page_size` is clamped to
/// `1..=100`, the range match-v5 accepts.
pub async fn collect_match_ids(client: &RiotClient, server: &str, puuid: &str, page_size: u32) -> Result<Vec<MatchId>> {
    debug!("Querying matches for puuid '{puuid}' in server region '{server}'");

    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    let mut match_ids = Vec::new();
    let mut start = 0u32;

    loop {
        let page = client.fetch_match_id_page(server, puuid, start, page_size).await?;
        let received = page.len();
        match_ids.extend(page);

        if received < page_size as usize {
            break;
        }
        start += page_size;
    }

    debug!(total = match_ids.len(), "Match history complete");
    Ok(match_ids)
}
