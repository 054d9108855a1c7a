//! Wallet session
//!
//! The top-level entry point embedders hold. A session owns the storage
//! backend, the RPC and quote-engine clients, and the credential vault,
//! with an explicit `open`/`close` lifecycle instead of ambient global
//! state. State changes are published on a broadcast channel so any number
//! of observers can react without the core knowing about rendering.

use crate::core::crypto::keys::{keypair_from_phrase, SecureSeedPhrase};
use crate::core::swap::{QuoteEngine, SwapInstructionBuilder, WhirlpoolQuoteClient};
use crate::core::transactions::TransactionSubmitter;
use crate::core::vault::CredentialVault;
use crate::domain::entities::WalletAccount;
use crate::infrastructure::platform::{FileStorage, PlatformStorage};
use crate::infrastructure::rpc::{JsonRpcLedger, LedgerRpc};
use crate::shared::constants::{ENV_DEFAULT_NETWORK, ENV_PROJECT_KEY, WHIRLPOOL_PROGRAM_ID};
use crate::shared::error::WalletError;
use crate::shared::types::{
    Network, PublicKeyString, SignatureString, SwapRequest, TokenBalance, WalletEvent,
};
use crate::shared::utils::validate_address;
use log::{debug, info};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signer::keypair::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 16;
const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Configuration a session is opened with
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub network: Network,
    /// Explicit RPC endpoint; when absent the network's default (or its
    /// env-var override) is used
    pub rpc_endpoint: Option<String>,
    /// Provider API key appended to the default endpoint
    pub api_key: Option<String>,
    /// Project key for access-password sealing; falls back to the
    /// environment when absent
    pub project_key: Option<String>,
}

impl SessionConfig {
    /// Build a config from the environment, with devnet defaults
    pub fn from_env() -> Self {
        let network = std::env::var(ENV_DEFAULT_NETWORK)
            .map(|name| Network::from_name(&name))
            .unwrap_or(Network::Devnet);

        Self {
            network,
            rpc_endpoint: None,
            api_key: None,
            project_key: std::env::var(ENV_PROJECT_KEY).ok(),
        }
    }

    fn resolve_endpoint(&self) -> String {
        if let Some(endpoint) = &self.rpc_endpoint {
            return endpoint.clone();
        }

        let base = std::env::var(self.network.rpc_env_var())
            .unwrap_or_else(|_| self.network.rpc_url().to_string());

        match &self.api_key {
            Some(key) if !key.is_empty() => format!("{}/{}", base.trim_end_matches('/'), key),
            _ => base,
        }
    }
}

pub struct WalletSession {
    config: SessionConfig,
    rpc: Arc<dyn LedgerRpc>,
    quote: Arc<dyn QuoteEngine>,
    vault: CredentialVault,
    account: Option<WalletAccount>,
    events: broadcast::Sender<WalletEvent>,
    // Rebuild the RPC stack on network change only when the endpoint was
    // derived from the network rather than injected
    owns_endpoint: bool,
}

impl WalletSession {
    /// Open a session with file storage and live RPC clients
    pub fn open(config: SessionConfig) -> Result<Self, WalletError> {
        let storage: Arc<dyn PlatformStorage> = Arc::new(FileStorage::new()?);
        let rpc: Arc<dyn LedgerRpc> = Arc::new(JsonRpcLedger::new(config.resolve_endpoint()));
        let program_id = Pubkey::from_str(WHIRLPOOL_PROGRAM_ID)
            .map_err(|_| WalletError::internal("Invalid pool program id"))?;
        let quote: Arc<dyn QuoteEngine> =
            Arc::new(WhirlpoolQuoteClient::new(rpc.clone(), program_id));

        let owns_endpoint = config.rpc_endpoint.is_none();
        let mut session = Self::with_collaborators(config, storage, rpc, quote);
        session.owns_endpoint = owns_endpoint;

        info!("Opened wallet session on {}", session.config.network.name());
        Ok(session)
    }

    /// Open with injected collaborators. The seam tests and embedders with
    /// their own storage or transport use.
    pub fn with_collaborators(
        config: SessionConfig,
        storage: Arc<dyn PlatformStorage>,
        rpc: Arc<dyn LedgerRpc>,
        quote: Arc<dyn QuoteEngine>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            rpc,
            quote,
            vault: CredentialVault::new(storage),
            account: None,
            events,
            owns_endpoint: false,
        }
    }

    /// Close the session, dropping any connected identity
    pub fn close(mut self) {
        if self.account.take().is_some() {
            let _ = self.events.send(WalletEvent::Disconnected);
        }
        info!("Closed wallet session");
    }

    /// Subscribe to session state changes
    pub fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }

    pub fn network(&self) -> &Network {
        &self.config.network
    }

    pub fn account(&self) -> Option<&WalletAccount> {
        self.account.as_ref()
    }

    pub fn vault(&self) -> &CredentialVault {
        &self.vault
    }

    /// Point the session at a connected public key
    pub fn connect(&mut self, public_key: &str) -> Result<(), WalletError> {
        validate_address(public_key)?;
        self.account = Some(WalletAccount::new(
            public_key.to_string(),
            self.config.network.clone(),
        ));
        let _ = self
            .events
            .send(WalletEvent::Connected(public_key.to_string()));
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if self.account.take().is_some() {
            let _ = self.events.send(WalletEvent::Disconnected);
        }
    }

    /// Switch clusters. Rebuilds the RPC stack when the session owns its
    /// endpoint choice.
    pub fn set_network(&mut self, network: Network) -> Result<(), WalletError> {
        if network == self.config.network {
            return Ok(());
        }

        self.config.network = network.clone();
        if self.owns_endpoint {
            let rpc: Arc<dyn LedgerRpc> =
                Arc::new(JsonRpcLedger::new(self.config.resolve_endpoint()));
            let program_id = Pubkey::from_str(WHIRLPOOL_PROGRAM_ID)
                .map_err(|_| WalletError::internal("Invalid pool program id"))?;
            self.quote = Arc::new(WhirlpoolQuoteClient::new(rpc.clone(), program_id));
            self.rpc = rpc;
        }

        if let Some(account) = &mut self.account {
            account.network = network.clone();
        }

        let _ = self.events.send(WalletEvent::NetworkChanged(network));
        Ok(())
    }

    fn connected_key(&self) -> Result<&str, WalletError> {
        self.account
            .as_ref()
            .map(|a| a.public_key.as_str())
            .ok_or_else(|| WalletError::validation("No wallet connected"))
    }

    fn resolve_project_key(&self) -> Result<String, WalletError> {
        self.config
            .project_key
            .clone()
            .or_else(|| std::env::var(ENV_PROJECT_KEY).ok())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| WalletError::config("There was an error getting the project ID"))
    }

    /// SOL balance of the connected wallet
    pub async fn get_balance(&self) -> Result<f64, WalletError> {
        let lamports = self.rpc.get_balance(self.connected_key()?).await?;
        Ok(lamports as f64 / LAMPORTS_PER_SOL)
    }

    /// SPL token balances of the connected wallet
    pub async fn get_token_balances(&self) -> Result<Vec<TokenBalance>, WalletError> {
        self.rpc.get_token_accounts(self.connected_key()?).await
    }

    /// Create a brand new wallet: fresh mnemonic, credentials stored,
    /// session connected. Returns the phrase so the caller can show it for
    /// backup exactly once.
    pub fn generate_wallet(
        &mut self,
        password: &str,
    ) -> Result<(PublicKeyString, SecureSeedPhrase), WalletError> {
        let project_key = self.resolve_project_key()?;
        let phrase = SecureSeedPhrase::generate()?;
        let public_key = self.store_wallet(&phrase, password, &project_key)?;
        Ok((public_key, phrase))
    }

    /// Import an existing mnemonic and store it under the given password
    pub fn import_wallet(
        &mut self,
        phrase: &str,
        password: &str,
    ) -> Result<PublicKeyString, WalletError> {
        let project_key = self.resolve_project_key()?;
        let phrase = SecureSeedPhrase::from_phrase(phrase)?;
        self.store_wallet(&phrase, password, &project_key)
    }

    fn store_wallet(
        &mut self,
        phrase: &SecureSeedPhrase,
        password: &str,
        project_key: &str,
    ) -> Result<PublicKeyString, WalletError> {
        let keypair = keypair_from_phrase(phrase.phrase())?;
        self.vault.store(&keypair, phrase, password)?;
        self.vault.store_access_password(project_key, password)?;

        let public_key = keypair.pubkey().to_string();
        self.connect(&public_key)?;
        Ok(public_key)
    }

    /// Unlock the stored wallet with the user's password and connect
    pub async fn unlock(&mut self, password: &str) -> Result<PublicKeyString, WalletError> {
        let project_key = self.resolve_project_key()?;
        let keypair = self.vault.unlock(password, &project_key).await?;
        let public_key = keypair.pubkey().to_string();
        self.connect(&public_key)?;
        Ok(public_key)
    }

    /// Sign and broadcast an already built transaction
    pub async fn send_transaction(
        &self,
        transaction: Transaction,
        signer: &Keypair,
    ) -> Result<SignatureString, WalletError> {
        TransactionSubmitter::new(self.rpc.clone())
            .submit(transaction, signer)
            .await
    }

    /// Recover the stored keypair, build the swap against live pool state,
    /// sign, broadcast, and wait for confirmation
    pub async fn execute_swap(
        &self,
        request: &SwapRequest,
    ) -> Result<SignatureString, WalletError> {
        // Credential presence is checked before anything touches the
        // network or the environment
        if !self.vault.has_stored_wallet()? {
            return Err(WalletError::storage(
                "Wallet information not found in localStorage",
            ));
        }

        let project_key = self.resolve_project_key()?;
        let keypair = self.vault.recover_keypair(&project_key).await?;

        debug!(
            "Executing swap {} -> {} for {}",
            request.from_mint, request.to_mint, request.amount
        );

        let builder = SwapInstructionBuilder::new(self.quote.clone(), self.rpc.clone());
        let transaction = builder.build(&keypair.pubkey(), request).await?;

        self.send_transaction(transaction, &keypair).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::swap::PoolState;
    use crate::infrastructure::platform::MemoryStorage;
    use async_trait::async_trait;
    use solana_sdk::hash::{hash, Hash};
    use std::sync::Mutex;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const PROJECT_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
    const PASSWORD: &str = "correct-password";

    struct FakeRpc {
        balance: u64,
        sent: Mutex<Vec<Transaction>>,
    }

    impl FakeRpc {
        fn new() -> Self {
            Self {
                balance: 2_500_000_000,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LedgerRpc for FakeRpc {
        async fn get_latest_blockhash(&self) -> Result<Hash, WalletError> {
            Ok(hash(b"recent"))
        }
        async fn send_transaction(&self, tx: &Transaction) -> Result<String, WalletError> {
            self.sent.lock().unwrap().push(tx.clone());
            Ok(tx.signatures[0].to_string())
        }
        async fn confirm_signature(&self, _sig: &str) -> Result<(), WalletError> {
            Ok(())
        }
        async fn get_balance(&self, _pubkey: &str) -> Result<u64, WalletError> {
            Ok(self.balance)
        }
        async fn get_token_accounts(&self, _o: &str) -> Result<Vec<TokenBalance>, WalletError> {
            Ok(vec![])
        }
        async fn get_account_data(&self, _pubkey: &str) -> Result<Vec<u8>, WalletError> {
            Ok(vec![])
        }
        async fn get_mint_decimals(&self, _mint: &str) -> Result<u8, WalletError> {
            Ok(6)
        }
    }

    struct FakeQuote {
        mint_a: Pubkey,
        mint_b: Pubkey,
    }

    #[async_trait]
    impl QuoteEngine for FakeQuote {
        fn pool_address(
            &self,
            _config: &Pubkey,
            _mint_a: &Pubkey,
            _mint_b: &Pubkey,
            _tick_spacing: u16,
        ) -> Result<Pubkey, WalletError> {
            Ok(Pubkey::new_unique())
        }
        async fn fetch_pool(&self, address: &Pubkey) -> Result<PoolState, WalletError> {
            Ok(PoolState {
                address: *address,
                tick_spacing: 64,
                tick_current_index: 0,
                token_mint_a: self.mint_a,
                token_vault_a: Pubkey::new_unique(),
                token_mint_b: self.mint_b,
                token_vault_b: Pubkey::new_unique(),
            })
        }
        fn tick_array_addresses(
            &self,
            pool: &Pubkey,
            _tick_current_index: i32,
            _tick_spacing: u16,
            _a_to_b: bool,
        ) -> Result<Vec<Pubkey>, WalletError> {
            Ok(vec![
                Pubkey::find_program_address(&[b"ta0"], pool).0,
                Pubkey::find_program_address(&[b"ta1"], pool).0,
                Pubkey::find_program_address(&[b"ta2"], pool).0,
            ])
        }
        fn oracle_address(&self, pool: &Pubkey) -> Result<Pubkey, WalletError> {
            Ok(Pubkey::find_program_address(&[b"oracle"], pool).0)
        }
    }

    struct TestHarness {
        session: WalletSession,
        rpc: Arc<FakeRpc>,
        mint_a: Pubkey,
        mint_b: Pubkey,
    }

    fn harness(project_key: Option<&str>) -> TestHarness {
        let rpc = Arc::new(FakeRpc::new());
        let mint_a = Pubkey::new_unique();
        let mint_b = Pubkey::new_unique();
        let quote = Arc::new(FakeQuote { mint_a, mint_b });

        let config = SessionConfig {
            network: Network::Devnet,
            rpc_endpoint: Some("http://localhost:8899".to_string()),
            api_key: None,
            project_key: project_key.map(str::to_string),
        };

        let session = WalletSession::with_collaborators(
            config,
            Arc::new(MemoryStorage::new()),
            rpc.clone(),
            quote,
        );

        TestHarness {
            session,
            rpc,
            mint_a,
            mint_b,
        }
    }

    fn swap_request(h: &TestHarness) -> SwapRequest {
        SwapRequest {
            pool_config: Pubkey::new_unique().to_string(),
            from_mint: h.mint_a.to_string(),
            to_mint: h.mint_b.to_string(),
            amount: "1.5".to_string(),
            min_amount_out: 1,
        }
    }

    #[test]
    fn test_connect_emits_event_and_sets_account() {
        let mut h = harness(Some(PROJECT_KEY));
        let mut events = h.session.subscribe();
        let key = Pubkey::new_unique().to_string();

        h.session.connect(&key).unwrap();

        assert_eq!(h.session.account().unwrap().public_key, key);
        assert_eq!(events.try_recv().unwrap(), WalletEvent::Connected(key));
    }

    #[test]
    fn test_connect_rejects_invalid_address() {
        let mut h = harness(Some(PROJECT_KEY));
        assert!(h.session.connect("not-an-address").is_err());
        assert!(h.session.account().is_none());
    }

    #[test]
    fn test_disconnect_emits_event() {
        let mut h = harness(Some(PROJECT_KEY));
        h.session.connect(&Pubkey::new_unique().to_string()).unwrap();

        let mut events = h.session.subscribe();
        h.session.disconnect();

        assert!(h.session.account().is_none());
        assert_eq!(events.try_recv().unwrap(), WalletEvent::Disconnected);
    }

    #[test]
    fn test_set_network_emits_event() {
        let mut h = harness(Some(PROJECT_KEY));
        let mut events = h.session.subscribe();

        h.session.set_network(Network::MainnetBeta).unwrap();

        assert_eq!(h.session.network(), &Network::MainnetBeta);
        assert_eq!(
            events.try_recv().unwrap(),
            WalletEvent::NetworkChanged(Network::MainnetBeta)
        );

        // No event when the network does not actually change
        h.session.set_network(Network::MainnetBeta).unwrap();
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_get_balance_converts_lamports() {
        let mut h = harness(Some(PROJECT_KEY));
        h.session.connect(&Pubkey::new_unique().to_string()).unwrap();
        assert_eq!(h.session.get_balance().await.unwrap(), 2.5);
    }

    #[tokio::test]
    async fn test_balance_requires_connection() {
        let h = harness(Some(PROJECT_KEY));
        assert!(h.session.get_balance().await.is_err());
    }

    #[test]
    fn test_generate_wallet_stores_and_connects() {
        let mut h = harness(Some(PROJECT_KEY));

        let (public_key, phrase) = h.session.generate_wallet(PASSWORD).unwrap();

        assert_eq!(phrase.word_count(), 12);
        assert!(h.session.vault().has_stored_wallet().unwrap());
        assert_eq!(h.session.account().unwrap().public_key, public_key);
    }

    #[test]
    fn test_import_wallet_derives_expected_key() {
        let mut h = harness(Some(PROJECT_KEY));

        let public_key = h.session.import_wallet(PHRASE, PASSWORD).unwrap();

        let expected = keypair_from_phrase(PHRASE).unwrap().pubkey().to_string();
        assert_eq!(public_key, expected);
        assert!(h.session.vault().has_stored_wallet().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlock_reconnects_stored_wallet() {
        let mut h = harness(Some(PROJECT_KEY));
        let imported = h.session.import_wallet(PHRASE, PASSWORD).unwrap();
        h.session.disconnect();

        let unlocked = h.session.unlock(PASSWORD).await.unwrap();
        assert_eq!(unlocked, imported);
        assert_eq!(h.session.account().unwrap().public_key, imported);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_swap_without_stored_wallet() {
        let h = harness(Some(PROJECT_KEY));

        let err = h.session.execute_swap(&swap_request(&h)).await.unwrap_err();
        assert!(err
            .to_string()
            .contains("Wallet information not found in localStorage"));
        // Failed before anything was broadcast
        assert!(h.rpc.sent.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_swap_without_project_key() {
        std::env::remove_var(ENV_PROJECT_KEY);
        let mut h = harness(None);
        h.session.config.project_key = Some(PROJECT_KEY.to_string());
        h.session.import_wallet(PHRASE, PASSWORD).unwrap();
        h.session.config.project_key = None;

        let err = h.session.execute_swap(&swap_request(&h)).await.unwrap_err();
        assert!(err
            .to_string()
            .contains("There was an error getting the project ID"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_swap_end_to_end() {
        let mut h = harness(Some(PROJECT_KEY));
        h.session.import_wallet(PHRASE, PASSWORD).unwrap();

        let signature = h.session.execute_swap(&swap_request(&h)).await.unwrap();

        let sent = h.rpc.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].verify().is_ok());
        assert_eq!(signature, sent[0].signatures[0].to_string());

        // Fee payer is the stored wallet
        let expected = keypair_from_phrase(PHRASE).unwrap().pubkey();
        assert_eq!(sent[0].message.account_keys[0], expected);
    }

    #[test]
    fn test_session_config_resolves_endpoint() {
        let config = SessionConfig {
            network: Network::MainnetBeta,
            rpc_endpoint: None,
            api_key: Some("apikey123".to_string()),
            project_key: None,
        };
        assert_eq!(
            config.resolve_endpoint(),
            "https://api.mainnet-beta.solana.com/apikey123"
        );

        let config = SessionConfig {
            rpc_endpoint: Some("http://localhost:8899".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_endpoint(), "http://localhost:8899");
    }
}
