use crate::{
    CampaignView, Confirmation, ContractError, Crowdfunding, TxAction,
    abi::Crowdfunding::{CrowdfundingInstance, getCampaignReturn},
};
use alloy_contract::{CallBuilder, CallDecoder};
use alloy_network::Ethereum;
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{PendingTransactionBuilder, Provider};
use alloy_rpc_types::TransactionReceipt;
use std::fmt;
use tracing::{debug, trace};

/// Typed access to a deployed crowdfunding contract.
///
/// Write operations return as soon as the node accepted the transaction. Waiting for it to be
/// mined is a separate step, see [`PendingCampaignTx::confirm`].
#[derive(Clone, Debug)]
pub struct CampaignClient<P> {
    address: Address,
    provider: P,
    /// Account the node signs with, for node managed wallets. `None` lets the provider's own
    /// wallet pick the sender.
    sender: Option<Address>,
}

impl<P: Provider> CampaignClient<P> {
    pub fn new(address: Address, provider: P) -> Self {
        Self { address, provider, sender: None }
    }

    /// Sends every write from `sender`.
    pub fn with_sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn sender(&self) -> Option<Address> {
        self.sender
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Binds the contract to the provider. Cheap, done once per call.
    fn instance(&self) -> CrowdfundingInstance<&P> {
        Crowdfunding::new(self.address, &self.provider)
    }

    /// Submits `createCampaign(goal, duration)`.
    pub async fn create_campaign(
        &self,
        goal: U256,
        duration: U256,
    ) -> Result<PendingCampaignTx, ContractError> {
        if goal.is_zero() || duration.is_zero() {
            return Err(ContractError::InvalidArgument("Missing goal or duration"));
        }
        let instance = self.instance();
        self.send(TxAction::CreateCampaign, instance.createCampaign(goal, duration)).await
    }

    /// Reads a campaign.
    pub async fn get_campaign(&self, id: U256) -> Result<CampaignView, ContractError> {
        trace!(target: "contract", %id, "getCampaign");
        let getCampaignReturn { _0: creator, _1: goal, _2: deadline, _3: pledged, _4: claimed } =
            self.instance().getCampaign(id).call().await?;
        let campaign = CampaignView { creator, goal, deadline, pledged, claimed };
        if campaign.is_empty() {
            return Err(ContractError::NotFound(id));
        }
        Ok(campaign)
    }

    /// Submits `pledge(id)` carrying `value` wei.
    pub async fn pledge(&self, id: U256, value: U256) -> Result<PendingCampaignTx, ContractError> {
        if value.is_zero() {
            return Err(ContractError::InvalidArgument("Missing pledge value"));
        }
        let instance = self.instance();
        self.send(TxAction::Pledge, instance.pledge(id).value(value))
            .await
            .map_err(ContractError::into_pledge_error)
    }

    /// Submits `withdraw(id)`.
    pub async fn withdraw(&self, id: U256) -> Result<PendingCampaignTx, ContractError> {
        let instance = self.instance();
        self.send(TxAction::Withdraw, instance.withdraw(id)).await
    }

    /// Submits `refund(id)`.
    pub async fn refund(&self, id: U256) -> Result<PendingCampaignTx, ContractError> {
        let instance = self.instance();
        self.send(TxAction::Refund, instance.refund(id)).await
    }

    async fn send<Q: Provider, D: CallDecoder>(
        &self,
        action: TxAction,
        mut call: CallBuilder<Q, D>,
    ) -> Result<PendingCampaignTx, ContractError> {
        if let Some(sender) = self.sender {
            call = call.from(sender);
        }
        let pending = call.send().await?;
        debug!(target: "contract", %action, tx_hash = %pending.tx_hash(), "submitted transaction");
        Ok(PendingCampaignTx { action, inner: pending })
    }
}

/// A submitted, not yet confirmed, contract write.
pub struct PendingCampaignTx {
    action: TxAction,
    inner: PendingTransactionBuilder<Ethereum>,
}

impl PendingCampaignTx {
    pub fn action(&self) -> TxAction {
        self.action
    }

    pub fn tx_hash(&self) -> TxHash {
        *self.inner.tx_hash()
    }

    /// Waits until the transaction is buried under `confirmations` blocks.
    ///
    /// There is no timeout: a stalled chain keeps this pending until the caller gives up.
    pub async fn confirm(self, confirmations: u64) -> Result<Confirmation, ContractError> {
        let Self { action, inner } = self;
        let receipt = inner.with_required_confirmations(confirmations).get_receipt().await?;
        confirmation_from_receipt(action, &receipt)
    }
}

/// Turns a mined receipt into a [`Confirmation`], failing if execution reverted.
///
/// Only [`TxAction::CreateCampaign`] reads the `CampaignCreated` log for the new id.
pub(crate) fn confirmation_from_receipt(
    action: TxAction,
    receipt: &TransactionReceipt,
) -> Result<Confirmation, ContractError> {
    let tx_hash = receipt.transaction_hash;
    if !receipt.status() {
        return Err(ContractError::ContractRevert(format!(
            "transaction {tx_hash} reverted during execution"
        )));
    }

    let campaign_id = match action {
        TxAction::CreateCampaign => receipt.inner.logs().iter().find_map(|log| {
            log.log_decode::<Crowdfunding::CampaignCreated>()
                .ok()
                .map(|log| log.inner.data.campaignId)
        }),
        _ => None,
    };
    let block_number = receipt.block_number;
    debug!(
        target: "contract",
        %action, %tx_hash, ?block_number, ?campaign_id,
        "transaction confirmed"
    );

    Ok(Confirmation { action, tx_hash, block_number, campaign_id })
}

impl fmt::Debug for PendingCampaignTx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCampaignTx")
            .field("action", &self.action)
            .field("tx_hash", self.inner.tx_hash())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, address};
    use alloy_provider::ProviderBuilder;
    use alloy_rpc_types::Log;
    use alloy_sol_types::{SolEvent, SolValue};
    use alloy_transport::mock::Asserter;
    use serde_json::json;

    const CONTRACT: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
    const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    fn mocked_client() -> (CampaignClient<impl Provider>, Asserter) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());
        (CampaignClient::new(CONTRACT, provider), asserter)
    }

    fn encoded_campaign(creator: Address, goal: u64, deadline: u64, claimed: bool) -> Vec<u8> {
        (creator, U256::from(goal), U256::from(deadline), U256::from(250), claimed)
            .abi_encode_params()
    }

    fn receipt(status: bool, logs: Vec<Log>) -> TransactionReceipt {
        let status = if status { "0x1" } else { "0x0" };
        serde_json::from_value(json!({
            "type": "0x2",
            "status": status,
            "cumulativeGasUsed": "0x1d4c0",
            "logs": logs,
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "transactionHash": B256::repeat_byte(0xaa),
            "transactionIndex": "0x0",
            "blockHash": B256::repeat_byte(0xbb),
            "blockNumber": "0x7",
            "gasUsed": "0x1d4c0",
            "effectiveGasPrice": "0x3b9aca00",
            "from": ALICE,
            "to": CONTRACT,
            "contractAddress": null,
        }))
        .unwrap()
    }

    fn campaign_created(id: u64) -> Log {
        let event = Crowdfunding::CampaignCreated {
            campaignId: U256::from(id),
            creator: ALICE,
            goal: U256::from(1000),
            deadline: U256::from(1_700_003_600u64),
        };
        Log {
            inner: alloy_primitives::Log { address: CONTRACT, data: event.encode_log_data() },
            ..Default::default()
        }
    }

    #[test]
    fn reverted_receipt_is_contract_revert() {
        let receipt = receipt(false, vec![]);
        let err = confirmation_from_receipt(TxAction::Pledge, &receipt).unwrap_err();
        assert!(err.is_revert());
        assert_eq!(
            err.to_string(),
            format!("transaction {} reverted during execution", B256::repeat_byte(0xaa))
        );
    }

    #[test]
    fn create_confirmation_reads_campaign_id() {
        let receipt = receipt(true, vec![campaign_created(3)]);

        let confirmation = confirmation_from_receipt(TxAction::CreateCampaign, &receipt).unwrap();
        assert_eq!(confirmation.action, TxAction::CreateCampaign);
        assert_eq!(confirmation.tx_hash, B256::repeat_byte(0xaa));
        assert_eq!(confirmation.block_number, Some(7));
        assert_eq!(confirmation.campaign_id, Some(U256::from(3)));

        // Other actions never report an id, even if the log is present.
        let confirmation = confirmation_from_receipt(TxAction::Refund, &receipt).unwrap();
        assert_eq!(confirmation.campaign_id, None);
    }

    #[test]
    fn create_confirmation_without_event() {
        let confirmation =
            confirmation_from_receipt(TxAction::CreateCampaign, &receipt(true, vec![])).unwrap();
        assert_eq!(confirmation.campaign_id, None);
    }

    #[tokio::test]
    async fn get_campaign_decodes_fields() {
        let (client, asserter) = mocked_client();
        asserter.push_success(&alloy_primitives::Bytes::from(encoded_campaign(
            ALICE,
            1000,
            1_700_003_600,
            false,
        )));

        let campaign = client.get_campaign(U256::ZERO).await.unwrap();
        assert_eq!(campaign.creator, ALICE);
        assert_eq!(campaign.goal, U256::from(1000));
        assert_eq!(campaign.deadline, U256::from(1_700_003_600u64));
        assert_eq!(campaign.pledged, U256::from(250));
        assert!(!campaign.claimed);
    }

    #[tokio::test]
    async fn get_campaign_unknown_id() {
        let (client, asserter) = mocked_client();
        asserter.push_success(&alloy_primitives::Bytes::from(encoded_campaign(
            Address::ZERO,
            0,
            0,
            false,
        )));

        let err = client.get_campaign(U256::from(42)).await.unwrap_err();
        assert!(matches!(err, ContractError::NotFound(id) if id == U256::from(42)));
        assert_eq!(err.to_string(), "campaign 42 does not exist");
    }

    #[tokio::test]
    async fn get_campaign_passes_revert_through() {
        let (client, asserter) = mocked_client();
        asserter.push_failure_msg("execution reverted: Invalid campaign");

        let err = client.get_campaign(U256::from(7)).await.unwrap_err();
        assert!(err.is_revert());
        assert_eq!(err.to_string(), "execution reverted: Invalid campaign");
    }

    #[tokio::test]
    async fn rejects_non_positive_arguments_locally() {
        let (client, _asserter) = mocked_client();

        let err = client.create_campaign(U256::ZERO, U256::from(3600)).await.unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument("Missing goal or duration")));

        let err = client.create_campaign(U256::from(1000), U256::ZERO).await.unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument(_)));

        let err = client.pledge(U256::ZERO, U256::ZERO).await.unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument("Missing pledge value")));
    }

    #[tokio::test]
    async fn write_returns_after_submission() {
        let (client, asserter) = mocked_client();
        let client = client.with_sender(ALICE);
        let hash = B256::repeat_byte(0x11);
        asserter.push_success(&hash);

        let pending = client.withdraw(U256::from(1)).await.unwrap();
        assert_eq!(pending.tx_hash(), hash);
        assert_eq!(pending.action(), TxAction::Withdraw);
    }

    #[tokio::test]
    async fn rejected_pledge_is_insufficient_value() {
        let (client, asserter) = mocked_client();
        asserter.push_failure_msg("execution reverted: Campaign has ended");

        let err = client.pledge(U256::from(1), U256::from(10)).await.unwrap_err();
        let ContractError::InsufficientValue(reason) = &err else { panic!("{err:?}") };
        assert_eq!(reason, "execution reverted: Campaign has ended");
        assert!(err.is_revert());
    }
}
