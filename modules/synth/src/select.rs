use cfsub_core::{Measurement, Settings};

pub const LOOPBACK: &str = "127.0.0.1";

/// One config to generate: its 1-based file ordinal and target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub ordinal: usize,
    pub address: String,
    /// Replaces the remote port when set.
    pub port: Option<u16>,
}

/// Where generated configs point, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<'a> {
    /// Local redirect on loopback. Beats everything else.
    Cutter(u16),
    /// Literal address from the command line.
    Literal(&'a str),
    /// The ranked scan rows, capped at `limit` files.
    Ranked { rows: &'a [Measurement], limit: usize },
}

impl<'a> Selection<'a> {
    pub fn choose(settings: &'a Settings, ranked: &'a [Measurement]) -> Self {
        if let Some(port) = settings.cutter_port.filter(|p| *p != 0) {
            return Selection::Cutter(port);
        }
        if let Some(ip) = settings.ip_override.as_deref().filter(|ip| !ip.is_empty()) {
            return Selection::Literal(ip);
        }
        Selection::Ranked { rows: ranked, limit: settings.number }
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        match self {
            Selection::Cutter(port) => vec![Endpoint { ordinal: 1, address: LOOPBACK.to_string(), port: Some(*port) }],
            Selection::Literal(ip) => vec![Endpoint { ordinal: 1, address: ip.to_string(), port: None }],
            // every row gets an ordinal; only those within the limit are emitted
            Selection::Ranked { rows, limit } => rows
                .iter()
                .zip(1..)
                .filter(|(_, ordinal)| ordinal <= limit)
                .map(|(row, ordinal)| Endpoint { ordinal, address: row.address.clone(), port: None })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Measurement> {
        (0..n).map(|i| Measurement::new(format!("10.0.0.{i}"), [0.0; 6])).collect()
    }

    #[test]
    fn ranked_rows_are_capped_at_number() {
        let ranked = rows(10);
        let settings = Settings { number: 3, ..Settings::default() };
        let eps = Selection::choose(&settings, &ranked).endpoints();
        assert_eq!(eps.len(), 3);
        for (i, ep) in eps.iter().enumerate() {
            assert_eq!(ep.ordinal, i + 1);
            assert_eq!(ep.address, ranked[i].address);
            assert_eq!(ep.port, None);
        }
    }

    #[test]
    fn fewer_rows_than_number_writes_all_rows() {
        let ranked = rows(2);
        let settings = Settings { number: 5, ..Settings::default() };
        assert_eq!(Selection::choose(&settings, &ranked).endpoints().len(), 2);
    }

    #[test]
    fn zero_number_writes_nothing() {
        let ranked = rows(4);
        let settings = Settings { number: 0, ..Settings::default() };
        assert!(Selection::choose(&settings, &ranked).endpoints().is_empty());
    }

    #[test]
    fn literal_ip_yields_single_endpoint() {
        let ranked = rows(10);
        let settings = Settings { ip_override: Some("discord.com".into()), number: 3, ..Settings::default() };
        let eps = Selection::choose(&settings, &ranked).endpoints();
        assert_eq!(eps, vec![Endpoint { ordinal: 1, address: "discord.com".into(), port: None }]);
    }

    #[test]
    fn empty_literal_ip_is_ignored() {
        let ranked = rows(1);
        let settings = Settings { ip_override: Some(String::new()), ..Settings::default() };
        assert!(matches!(Selection::choose(&settings, &ranked), Selection::Ranked { .. }));
    }

    #[test]
    fn cutter_port_wins_over_literal_and_ranking() {
        let ranked = rows(10);
        let settings = Settings { cutter_port: Some(22500), ip_override: Some("discord.com".into()), ..Settings::default() };
        let eps = Selection::choose(&settings, &ranked).endpoints();
        assert_eq!(eps, vec![Endpoint { ordinal: 1, address: LOOPBACK.into(), port: Some(22500) }]);
    }
}
