use report_core::{FallbackTables, Fundamentals, MarketDataProvider, PeerComparison, PeerRow};

/// Subject row followed by each mapped peer whose fundamentals could be
/// fetched. Peers are looked up one at a time; a failed peer is skipped.
pub async fn compare_peers(
    market: &dyn MarketDataProvider,
    tables: &FallbackTables,
    symbol: &str,
    subject: &Fundamentals,
) -> PeerComparison {
    let mut peers = vec![PeerRow::from_fundamentals(symbol, subject)];

    for peer in tables.peers_for(symbol) {
        match market.fundamentals(peer).await {
            Ok(f) => peers.push(PeerRow::from_fundamentals(peer, &f)),
            Err(e) => tracing::warn!("Peer {} of {} skipped: {}", peer, symbol, e),
        }
    }

    PeerComparison {
        peers,
        sector: subject.sector.clone().unwrap_or_default(),
        industry: subject.industry.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubMarket;

    #[tokio::test]
    async fn test_subject_first_for_unmapped_ticker() {
        let market = StubMarket::default();
        let subject = Fundamentals {
            short_name: Some("Obscure Corp".into()),
            trailing_pe: Some(12.0),
            ..Default::default()
        };
        let comparison = compare_peers(&market, &FallbackTables::default(), "zzzz", &subject).await;

        assert_eq!(comparison.peers.len(), 1);
        assert_eq!(comparison.peers[0].symbol, "ZZZZ");
        assert_eq!(comparison.peers[0].name, "Obscure Corp");
        assert_eq!(comparison.sector, "");
    }

    #[tokio::test]
    async fn test_failed_peers_are_skipped() {
        let market = StubMarket::default()
            .with_company("F", "Ford Motor Company", 150.0)
            .with_company("TM", "Toyota Motor Corporation", 105.0);
        let subject = Fundamentals {
            short_name: Some("Tesla, Inc.".into()),
            sector: Some("Consumer Cyclical".into()),
            industry: Some("Auto Manufacturers".into()),
            debt_to_equity: Some(17.0),
            ..Default::default()
        };
        let comparison = compare_peers(&market, &FallbackTables::default(), "TSLA", &subject).await;

        let symbols: Vec<&str> = comparison.peers.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["TSLA", "F", "TM"]);
        assert!((comparison.peers[0].debt_to_equity - 0.17).abs() < 1e-12);
        assert!((comparison.peers[1].debt_to_equity - 1.5).abs() < 1e-12);
        assert_eq!(comparison.industry, "Auto Manufacturers");
    }
}
