use alloy_primitives::U256;
use alloy_provider::Provider;
use async_trait::async_trait;
use crowdchain_contract::{CampaignClient, CampaignView, Confirmation, ContractError};

/// The operations the proxy exposes over HTTP.
///
/// Writes resolve once the transaction is confirmed, not merely submitted.
#[async_trait]
pub trait CampaignBackend: Send + Sync + 'static {
    async fn create_campaign(
        &self,
        goal: U256,
        duration: U256,
    ) -> Result<Confirmation, ContractError>;

    async fn get_campaign(&self, id: U256) -> Result<CampaignView, ContractError>;

    async fn pledge(&self, id: U256, value: U256) -> Result<Confirmation, ContractError>;

    async fn withdraw(&self, id: U256) -> Result<Confirmation, ContractError>;

    async fn refund(&self, id: U256) -> Result<Confirmation, ContractError>;
}

/// [`CampaignBackend`] talking to the deployed contract with a single signing identity.
#[derive(Clone, Debug)]
pub struct ContractBackend<P> {
    client: CampaignClient<P>,
    confirmations: u64,
}

impl<P: Provider> ContractBackend<P> {
    pub fn new(client: CampaignClient<P>, confirmations: u64) -> Self {
        Self { client, confirmations }
    }
}

#[async_trait]
impl<P: Provider + 'static> CampaignBackend for ContractBackend<P> {
    async fn create_campaign(
        &self,
        goal: U256,
        duration: U256,
    ) -> Result<Confirmation, ContractError> {
        self.client.create_campaign(goal, duration).await?.confirm(self.confirmations).await
    }

    async fn get_campaign(&self, id: U256) -> Result<CampaignView, ContractError> {
        self.client.get_campaign(id).await
    }

    async fn pledge(&self, id: U256, value: U256) -> Result<Confirmation, ContractError> {
        self.client.pledge(id, value).await?.confirm(self.confirmations).await
    }

    async fn withdraw(&self, id: U256) -> Result<Confirmation, ContractError> {
        self.client.withdraw(id).await?.confirm(self.confirmations).await
    }

    async fn refund(&self, id: U256) -> Result<Confirmation, ContractError> {
        self.client.refund(id).await?.confirm(self.confirmations).await
    }
}
