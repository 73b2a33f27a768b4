use serde::{Deserialize, Serialize};

/// One network a coin can be received on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub address: String,
    pub qr: String,
}

/// Donation currency with its receiving networks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub coin: String,
    pub name: String,
    pub icon: String,
    pub networks: Vec<Network>,
}

const QR_BASE: &str = "https://api.qrserver.com/v1/create-qr-code/?size=180x180&data=";

fn network(key: &str, label: &str, icon: &str, address: &str, qr_prefix: &str) -> Network {
    Network {
        key: key.to_string(),
        label: label.to_string(),
        icon: icon.to_string(),
        address: address.to_string(),
        qr: format!("{}{}:{}", QR_BASE, qr_prefix, address),
    }
}

fn currency(coin: &str, name: &str, networks: Vec<Network>) -> Currency {
    Currency {
        coin: coin.to_string(),
        name: name.to_string(),
        icon: format!("{}-icon.png", coin),
        networks,
    }
}

/// Catalog seeded into an empty store at startup
pub fn builtin_catalog() -> Vec<Currency> {
    vec![
        currency(
            "btc",
            "Bitcoin",
            vec![network(
                "mainnet",
                "Mainnet",
                "mainnet-icon.png",
                "1BoatSLRHtKNngkdXEeobR76b53LETtpyT",
                "bitcoin",
            )],
        ),
        currency(
            "eth",
            "Ethereum",
            vec![network(
                "erc20",
                "ERC20 - Mainnet",
                "erc20-icon.png",
                "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B",
                "ethereum",
            )],
        ),
        currency(
            "usdc",
            "USD Coin",
            vec![
                network(
                    "erc20",
                    "Ethereum (ERC20)",
                    "erc20-icon.png",
                    "0x111111111117dC0aa78b770fA6A738034120C302",
                    "usdc:erc20",
                ),
                network(
                    "solana",
                    "Solana",
                    "solana-icon.png",
                    "9xQeWvG816bUx9EPjHmaT9NwGyShtdD5mF7mD5PsnkFQ",
                    "usdc:solana",
                ),
            ],
        ),
        currency(
            "usdt",
            "Tether",
            vec![network(
                "erc20",
                "ERC20",
                "erc20-icon.png",
                "0xdAC17F958D2ee523a2206206994597C13D831ec7",
                "usdt:erc20",
            )],
        ),
        currency(
            "ltc",
            "Litecoin",
            vec![network(
                "mainnet",
                "Mainnet",
                "mainnet-icon.png",
                "LcHKuwFZXyp5pTDL5wQHzpiapQDPZwsC5V",
                "litecoin",
            )],
        ),
        currency(
            "xrp",
            "XRP",
            vec![network(
                "mainnet",
                "Mainnet",
                "mainnet-icon.png",
                "rEb8TK3gBgk5auZkwc6sHnwrGVJH8DuaLh",
                "xrp",
            )],
        ),
        currency(
            "trx",
            "Tron",
            vec![network(
                "trc20",
                "TRC20",
                "trc20-icon.png",
                "TQm8kxzZjQihjM4cnSbVgkP9Nwqx6RpQ3h",
                "trx",
            )],
        ),
        currency(
            "doge",
            "Dogecoin",
            vec![network(
                "mainnet",
                "Mainnet",
                "mainnet-icon.png",
                "D8B4yJrZ9gH9c3yDd1HmbvH9uCnZbkkj5h",
                "dogecoin",
            )],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = builtin_catalog();
        let coins: Vec<&str> = catalog.iter().map(|c| c.coin.as_str()).collect();

        assert_eq!(
            coins,
            ["btc", "eth", "usdc", "usdt", "ltc", "xrp", "trx", "doge"]
        );
        assert_eq!(catalog[2].networks.len(), 2);
        assert_eq!(catalog[0].icon, "btc-icon.png");
    }

    #[test]
    fn test_qr_urls_embed_address() {
        let catalog = builtin_catalog();
        let usdc_solana = &catalog[2].networks[1];

        assert_eq!(
            usdc_solana.qr,
            "https://api.qrserver.com/v1/create-qr-code/?size=180x180&data=usdc:solana:9xQeWvG816bUx9EPjHmaT9NwGyShtdD5mF7mD5PsnkFQ"
        );
        assert!(catalog
            .iter()
            .flat_map(|c| &c.networks)
            .all(|n| n.qr.ends_with(&n.address)));
    }
}
