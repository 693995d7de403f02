//! # Gateway Channels
//!
//! The boundary between the engine and the transport beneath it. A
//! [`Channel`] delivers one signed transaction or one query to one gateway
//! node and hands back the typed response; how the bytes travel (gRPC, TLS,
//! an in-memory test network) is the implementor's business.
//!
//! Channels are long-lived and shared: the [`ChannelPool`] keeps at most one
//! per gateway and every concurrent call dispatching to that gateway uses
//! it. Implementations must therefore tolerate concurrent use.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::envelope::query::QueryData;
use crate::identity::Address;
use crate::network::rpc::{QueryResponse, RemoteMethod, TransactionResponse};
use crate::signing::SignedTransaction;

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures below the RPC layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The gateway could not be reached.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete within its dispatch timeout.
    #[error("dispatch deadline exceeded")]
    DeadlineExceeded,

    /// The gateway shed the request under load.
    #[error("gateway resource exhausted")]
    ResourceExhausted,

    /// The gateway failed while handling the request.
    #[error("gateway internal error: {0}")]
    Internal(String),

    /// The request or response could not be encoded.
    #[error("transport encoding error: {0}")]
    Encoding(String),
}

impl TransportError {
    /// Whether resending the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::DeadlineExceeded | Self::ResourceExhausted
        )
    }

    /// Whether the gateway looks unresponsive, so the next attempt should go
    /// to a different one.
    pub fn should_rotate(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::DeadlineExceeded)
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// A network node that accepts client requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gateway {
    /// The node's account; transactions name it as their submitting node.
    pub node: Address,
    /// Transport endpoint, e.g. `"34.94.106.61:50211"`.
    pub url: String,
}

impl Gateway {
    pub fn new(node: Address, url: impl Into<String>) -> Self {
        Self {
            node,
            url: url.into(),
        }
    }
}

impl fmt::Display for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.node, self.url)
    }
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// An open connection to one gateway.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Submits a signed transaction via `method`.
    async fn submit_transaction(
        &self,
        method: RemoteMethod,
        transaction: &SignedTransaction,
    ) -> Result<TransactionResponse, TransportError>;

    /// Sends a query via `method`.
    async fn submit_query(
        &self,
        method: RemoteMethod,
        query: &QueryData,
    ) -> Result<QueryResponse, TransportError>;
}

/// Opens channels to gateways.
pub trait ChannelFactory: Send + Sync {
    /// Opens a channel to `gateway`. Called once per gateway per pool.
    fn connect(&self, gateway: &Gateway) -> Result<Arc<dyn Channel>, TransportError>;
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

/// Caches one shared channel per gateway.
pub struct ChannelPool {
    factory: Arc<dyn ChannelFactory>,
    channels: DashMap<Gateway, Arc<dyn Channel>>,
}

impl ChannelPool {
    pub fn new(factory: Arc<dyn ChannelFactory>) -> Self {
        Self {
            factory,
            channels: DashMap::new(),
        }
    }

    /// Returns the channel for `gateway`, opening it on first use.
    ///
    /// `connect` runs without holding the map's shard lock. Two calls
    /// racing on a new gateway may both connect; the first insert wins and
    /// both get that channel.
    pub fn get(&self, gateway: &Gateway) -> Result<Arc<dyn Channel>, TransportError> {
        if let Some(channel) = self.channels.get(gateway) {
            return Ok(Arc::clone(channel.value()));
        }
        debug!(gateway = %gateway, "opening channel");
        let channel = self.factory.connect(gateway)?;
        let shared = self.channels.entry(gateway.clone()).or_insert(channel);
        Ok(Arc::clone(shared.value()))
    }

    /// Number of open channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// `true` if no channel has been opened yet.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl fmt::Debug for ChannelPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelPool")
            .field("open", &self.channels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{OnceLock, Weak};

    struct NullChannel;

    #[async_trait]
    impl Channel for NullChannel {
        async fn submit_transaction(
            &self,
            _method: RemoteMethod,
            _transaction: &SignedTransaction,
        ) -> Result<TransactionResponse, TransportError> {
            Err(TransportError::Unavailable("null".into()))
        }

        async fn submit_query(
            &self,
            _method: RemoteMethod,
            _query: &QueryData,
        ) -> Result<QueryResponse, TransportError> {
            Err(TransportError::Unavailable("null".into()))
        }
    }

    #[derive(Default)]
    struct CountingFactory {
        connects: AtomicUsize,
    }

    impl ChannelFactory for CountingFactory {
        fn connect(&self, _gateway: &Gateway) -> Result<Arc<dyn Channel>, TransportError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(NullChannel))
        }
    }

    #[test]
    fn transient_transport_errors() {
        assert!(TransportError::Unavailable("x".into()).is_transient());
        assert!(TransportError::DeadlineExceeded.is_transient());
        assert!(TransportError::ResourceExhausted.is_transient());
        assert!(!TransportError::Internal("x".into()).is_transient());
        assert!(!TransportError::Encoding("x".into()).is_transient());

        assert!(TransportError::DeadlineExceeded.should_rotate());
        assert!(!TransportError::ResourceExhausted.should_rotate());
    }

    #[test]
    fn pool_opens_one_channel_per_gateway() {
        let factory = Arc::new(CountingFactory::default());
        let pool = ChannelPool::new(factory.clone());
        let a = Gateway::new(Address::new(0, 0, 3), "node-3:50211");
        let b = Gateway::new(Address::new(0, 0, 4), "node-4:50211");

        let first = pool.get(&a).unwrap();
        let again = pool.get(&a).unwrap();
        pool.get(&b).unwrap();

        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(pool.len(), 2);
        assert_eq!(factory.connects.load(Ordering::SeqCst), 2);
    }

    /// Looks into the pool it belongs to while connecting.
    #[derive(Default)]
    struct PeekingFactory {
        pool: OnceLock<Weak<ChannelPool>>,
        open_while_connecting: AtomicUsize,
    }

    impl ChannelFactory for PeekingFactory {
        fn connect(&self, _gateway: &Gateway) -> Result<Arc<dyn Channel>, TransportError> {
            if let Some(pool) = self.pool.get().and_then(Weak::upgrade) {
                self.open_while_connecting.store(pool.len(), Ordering::SeqCst);
            }
            Ok(Arc::new(NullChannel))
        }
    }

    #[test]
    fn connect_runs_outside_the_pool_lock() {
        let factory = Arc::new(PeekingFactory::default());
        let pool = Arc::new(ChannelPool::new(factory.clone()));
        factory.pool.set(Arc::downgrade(&pool)).ok();

        let a = Gateway::new(Address::new(0, 0, 3), "node-3:50211");
        let b = Gateway::new(Address::new(0, 0, 4), "node-4:50211");
        pool.get(&a).unwrap();
        pool.get(&b).unwrap();

        assert_eq!(factory.open_while_connecting.load(Ordering::SeqCst), 1);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn gateway_display() {
        let gateway = Gateway::new(Address::new(0, 0, 3), "node-3:50211");
        assert_eq!(gateway.to_string(), "0.0.3@node-3:50211");
    }
}
