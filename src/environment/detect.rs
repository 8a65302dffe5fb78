//! Provider capability detection.
//!
//! Pure inspection of the host environment: no side effects, no provider
//! calls. WalletConnect-class and deep-link wallets are always reported since
//! they need no injected object; an environment with nothing injected (tests,
//! servers) therefore still offers those kinds.

use crate::environment::types::WalletKind;
use crate::environment::WalletEnvironment;

/// Wallet kinds a connect attempt could reasonably target right now.
///
/// Injected kinds come first, in the order the environment reports them; one
/// injected object may advertise several kinds and all of them are kept.
/// Disambiguation happens at connect time, not here.
pub fn available_wallets<E: WalletEnvironment>(env: &E) -> Vec<WalletKind> {
    let mut kinds: Vec<WalletKind> = Vec::new();
    for kind in env.injected_wallets() {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    for universal in [WalletKind::WalletConnect, WalletKind::Other] {
        if !kinds.contains(&universal) {
            kinds.push(universal);
        }
    }
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::SimulatedEnvironment;

    #[test]
    fn test_empty_environment_still_offers_universal_kinds() {
        let env = SimulatedEnvironment::with_injected(1, vec![]);
        assert_eq!(
            available_wallets(&env),
            vec![WalletKind::WalletConnect, WalletKind::Other]
        );
    }

    #[test]
    fn test_injected_kinds_are_reported_first() {
        let env = SimulatedEnvironment::with_injected(
            1,
            vec![WalletKind::Metamask, WalletKind::Coinbase],
        );
        assert_eq!(
            available_wallets(&env),
            vec![
                WalletKind::Metamask,
                WalletKind::Coinbase,
                WalletKind::WalletConnect,
                WalletKind::Other,
            ]
        );
    }

    #[test]
    fn test_duplicate_flags_are_collapsed() {
        // One injected object may expose several wallet flags.
        let env = SimulatedEnvironment::with_injected(
            1,
            vec![
                WalletKind::Metamask,
                WalletKind::Metamask,
                WalletKind::Coinbase,
            ],
        );
        let kinds = available_wallets(&env);
        assert_eq!(
            kinds.iter().filter(|k| **k == WalletKind::Metamask).count(),
            1
        );
    }
}
