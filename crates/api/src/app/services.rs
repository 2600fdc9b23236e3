//! Service wiring: policies from the environment, the store, and the engine
//! services the routes call into.

use std::sync::Arc;
use std::time::Duration;

use devforum_core::{AccountId, DomainResult, StoreError};
use devforum_infra::InMemoryStore;
use devforum_ledger::{
    Account, BalanceLedger, DuplicateGuard, PostingPolicy, SpendReceipt,
};
use devforum_lockout::{LockSweeper, LockoutPolicy, SweepPolicy, LoginLockout};
use devforum_questions::QuestionDraft;

type Store = Arc<InMemoryStore>;

/// Runtime configuration. Policy constants keep their defaults unless the
/// matching environment variable overrides them.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub posting: PostingPolicy,
    pub lockout: LockoutPolicy,
    pub sweep: SweepPolicy,
    pub sweep_interval: Duration,
    pub bind_addr: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            posting: PostingPolicy::default(),
            lockout: LockoutPolicy::default(),
            sweep: SweepPolicy::default(),
            sweep_interval: Duration::from_secs(3600),
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            posting: PostingPolicy {
                question_cost: env_parse("QUESTION_COST", defaults.posting.question_cost),
                duplicate_window: chrono::Duration::seconds(env_parse(
                    "DUPLICATE_WINDOW_SECS",
                    defaults.posting.duplicate_window.num_seconds(),
                )),
            },
            lockout: LockoutPolicy {
                max_failed_attempts: env_parse(
                    "LOCKOUT_MAX_FAILED_ATTEMPTS",
                    defaults.lockout.max_failed_attempts,
                ),
                lock_window: chrono::Duration::minutes(env_parse(
                    "LOCKOUT_LOCK_MINUTES",
                    defaults.lockout.lock_window.num_minutes(),
                )),
            },
            sweep: SweepPolicy {
                page_size: env_parse("SWEEP_PAGE_SIZE", defaults.sweep.page_size),
            },
            sweep_interval: Duration::from_secs(env_parse(
                "SWEEP_INTERVAL_SECS",
                defaults.sweep_interval.as_secs(),
            )),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &'static str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(key, value = %raw, "ignoring unparseable environment override");
                default
            }
        },
        Err(_) => default,
    }
}

/// The engine services behind the HTTP surface, sharing one store.
pub struct AppServices {
    store: Store,
    ledger: BalanceLedger<Store>,
    guard: DuplicateGuard<Store>,
    lockout: LoginLockout<Store>,
    sweep: SweepPolicy,
    sweep_interval: Duration,
}

pub fn build_services(config: &ApiConfig) -> AppServices {
    AppServices::with_store(Arc::new(InMemoryStore::new()), config)
}

impl AppServices {
    pub fn with_store(store: Store, config: &ApiConfig) -> Self {
        Self {
            ledger: BalanceLedger::new(Arc::clone(&store), config.posting),
            guard: DuplicateGuard::new(Arc::clone(&store), config.posting.duplicate_window),
            lockout: LoginLockout::new(Arc::clone(&store), config.lockout),
            sweep: config.sweep,
            sweep_interval: config.sweep_interval,
            store,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Fund an account directly. Provisioning is a collaborator concern; this
    /// exists for dev/test wiring only.
    pub fn seed_account(&self, id: AccountId, balance: u64) -> Result<(), StoreError> {
        self.store.put_account(id, Account::with_balance(balance))
    }

    /// Duplicate guard, then the atomic debit-and-create transaction.
    pub fn post_question(
        &self,
        owner: AccountId,
        draft: &QuestionDraft,
    ) -> DomainResult<SpendReceipt> {
        self.guard.check(owner, draft.title())?;
        self.ledger.spend_and_create(owner, draft)
    }

    pub fn check_login_allowed(&self, identifier: &str) -> DomainResult<()> {
        self.lockout.check_allowed(identifier)
    }

    pub fn record_login_attempt(
        &self,
        identifier: &str,
        success: bool,
    ) -> DomainResult<Option<u32>> {
        self.lockout.record_attempt(identifier, success)
    }

    pub fn lock_sweeper(&self) -> LockSweeper<Store> {
        LockSweeper::new(Arc::clone(&self.store), self.sweep)
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }
}
