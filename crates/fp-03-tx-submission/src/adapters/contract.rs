//! FinP2P Operator Contract Adapter
//!
//! Typed bindings for the operator contract. Mutating functions go through
//! the [`TransactionSubmitter`]; views go straight to
//! [`LedgerClient::call`].

use crate::domain::errors::ContractError;
use crate::ports::outbound::LedgerClient;
use crate::service::TransactionSubmitter;
use fp_01_signature_codec::{InvestmentMessage, SignedMessage};
use shared_types::abi::{decode, encode_call, AbiValue};
use shared_types::contract::{
    execution_context_value, loan_terms_value, operation_params_value, term_value,
};
use shared_types::{
    decode_hex, AbiError, Address, ContractFunction, ExecutionContext, FinId, Hash,
    OperationParams, Term,
};
use tracing::debug;

/// Bound operator contract.
pub struct FinP2PContract<L: LedgerClient> {
    address: Address,
    submitter: TransactionSubmitter<L>,
}

impl<L: LedgerClient> FinP2PContract<L> {
    /// Bind the contract at `address`, sending through `submitter`.
    pub fn new(address: Address, submitter: TransactionSubmitter<L>) -> Self {
        Self { address, submitter }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Submitter used for mutating calls.
    pub fn submitter(&self) -> &TransactionSubmitter<L> {
        &self.submitter
    }

    // =========================================================================
    // MUTATING FUNCTIONS
    // =========================================================================

    /// `associateAsset(assetId, token)`
    pub async fn associate_asset(
        &self,
        asset_id: &str,
        token: Address,
    ) -> Result<Hash, ContractError> {
        self.execute(
            ContractFunction::AssociateAsset,
            vec![AbiValue::string(asset_id), AbiValue::Address(token)],
        )
        .await
    }

    /// Mint `term.amount` of `term` to `to`.
    pub async fn issue(
        &self,
        to: &FinId,
        term: &Term,
        ctx: &ExecutionContext,
    ) -> Result<Hash, ContractError> {
        self.execute(
            ContractFunction::Issue,
            vec![
                AbiValue::string(to.as_str()),
                term_value(term),
                execution_context_value(ctx),
            ],
        )
        .await
    }

    /// Move one leg of a signed investment.
    pub async fn transfer(
        &self,
        signed: &SignedMessage,
        params: &OperationParams,
        ctx: &ExecutionContext,
    ) -> Result<Hash, ContractError> {
        let args = settlement_args(signed, params, ctx)?;
        self.execute(ContractFunction::Transfer, args).await
    }

    /// Lock one leg of a signed investment under `params.operation_id`.
    pub async fn hold(
        &self,
        signed: &SignedMessage,
        params: &OperationParams,
        ctx: &ExecutionContext,
    ) -> Result<Hash, ContractError> {
        let args = settlement_args(signed, params, ctx)?;
        self.execute(ContractFunction::Hold, args).await
    }

    /// Burn `term.amount` from `owner`.
    pub async fn redeem(
        &self,
        owner: &FinId,
        term: &Term,
        ctx: &ExecutionContext,
    ) -> Result<Hash, ContractError> {
        self.execute(
            ContractFunction::Redeem,
            vec![
                AbiValue::string(owner.as_str()),
                term_value(term),
                execution_context_value(ctx),
            ],
        )
        .await
    }

    /// Release a hold to `to`.
    pub async fn release_to(
        &self,
        operation_id: &str,
        from: &FinId,
        to: &FinId,
        quantity: &str,
        ctx: &ExecutionContext,
    ) -> Result<Hash, ContractError> {
        self.execute(
            ContractFunction::ReleaseTo,
            vec![
                AbiValue::string(operation_id),
                AbiValue::string(from.as_str()),
                AbiValue::string(to.as_str()),
                AbiValue::string(quantity),
                execution_context_value(ctx),
            ],
        )
        .await
    }

    /// Release a hold and burn it.
    pub async fn release_and_redeem(
        &self,
        operation_id: &str,
        owner: &FinId,
        quantity: &str,
        ctx: &ExecutionContext,
    ) -> Result<Hash, ContractError> {
        self.execute(
            ContractFunction::ReleaseAndRedeem,
            vec![
                AbiValue::string(operation_id),
                AbiValue::string(owner.as_str()),
                AbiValue::string(quantity),
                execution_context_value(ctx),
            ],
        )
        .await
    }

    /// Return a hold to its owner.
    pub async fn release_back(
        &self,
        operation_id: &str,
        ctx: &ExecutionContext,
    ) -> Result<Hash, ContractError> {
        self.execute(
            ContractFunction::ReleaseBack,
            vec![AbiValue::string(operation_id), execution_context_value(ctx)],
        )
        .await
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    /// Token contract registered for `asset_id`.
    pub async fn get_asset_address(&self, asset_id: &str) -> Result<Address, ContractError> {
        let out = self
            .view(ContractFunction::GetAssetAddress, vec![AbiValue::string(asset_id)])
            .await?;
        match out.as_slice() {
            [AbiValue::Address(address)] => Ok(*address),
            _ => Err(unexpected(ContractFunction::GetAssetAddress)),
        }
    }

    /// Balance of `fin_id` in `asset_id`, as a decimal string.
    pub async fn get_balance(&self, asset_id: &str, fin_id: &FinId) -> Result<String, ContractError> {
        let out = self
            .view(
                ContractFunction::GetBalance,
                vec![AbiValue::string(asset_id), AbiValue::string(fin_id.as_str())],
            )
            .await?;
        match out.as_slice() {
            [AbiValue::String(balance)] => Ok(balance.clone()),
            _ => Err(unexpected(ContractFunction::GetBalance)),
        }
    }

    /// The contract's typed-data hash of `message`.
    ///
    /// Must equal the off-chain hash for the same domain.
    pub async fn hash_investment(&self, message: &InvestmentMessage) -> Result<Hash, ContractError> {
        let out = self
            .view(ContractFunction::HashInvestment, investment_args(message))
            .await?;
        match out.as_slice() {
            [AbiValue::FixedBytes32(hash)] => Ok(*hash),
            _ => Err(unexpected(ContractFunction::HashInvestment)),
        }
    }

    /// Ask the contract whether `signer` signed `signed`.
    pub async fn verify_investment_signature(
        &self,
        signed: &SignedMessage,
        signer: &FinId,
    ) -> Result<bool, ContractError> {
        let mut args = investment_args(&signed.message);
        args.push(AbiValue::string(signer.as_str()));
        args.push(AbiValue::Bytes(signature_bytes(signed)?));

        let out = self
            .view(ContractFunction::VerifyInvestmentSignature, args)
            .await?;
        match out.as_slice() {
            [AbiValue::Bool(valid)] => Ok(*valid),
            _ => Err(unexpected(ContractFunction::VerifyInvestmentSignature)),
        }
    }

    async fn execute(
        &self,
        function: ContractFunction,
        args: Vec<AbiValue>,
    ) -> Result<Hash, ContractError> {
        debug!(function = function.name(), "[fp-03] submitting contract call");
        let data = encode_call(&function.signature(), &args);
        Ok(self.submitter.submit_call(self.address, data).await?)
    }

    async fn view(
        &self,
        function: ContractFunction,
        args: Vec<AbiValue>,
    ) -> Result<Vec<AbiValue>, ContractError> {
        let data = encode_call(&function.signature(), &args);
        let out = self
            .submitter
            .ledger()
            .call(self.address, data)
            .await
            .map_err(ContractError::Rpc)?;
        Ok(decode(&function.outputs(), &out)?)
    }
}

fn unexpected(function: ContractFunction) -> ContractError {
    ContractError::Abi(AbiError::UnexpectedLayout(format!(
        "{} return value",
        function.name()
    )))
}

fn signature_bytes(signed: &SignedMessage) -> Result<Vec<u8>, ContractError> {
    decode_hex(&signed.signature_for_ledger())
        .map_err(|_| ContractError::InvalidSignature(signed.signature.clone()))
}

/// `hashInvestment` arguments.
fn investment_args(message: &InvestmentMessage) -> Vec<AbiValue> {
    let loan = message.loan_terms().cloned().unwrap_or_default();
    vec![
        AbiValue::uint(u64::from(message.primary_type().code())),
        AbiValue::string(message.nonce()),
        AbiValue::string(message.buyer().as_str()),
        AbiValue::string(message.seller().as_str()),
        term_value(message.asset()),
        term_value(message.settlement()),
        loan_terms_value(&loan),
    ]
}

/// `transfer` / `hold` arguments.
fn settlement_args(
    signed: &SignedMessage,
    params: &OperationParams,
    ctx: &ExecutionContext,
) -> Result<Vec<AbiValue>, ContractError> {
    let message = &signed.message;
    let loan = message.loan_terms().cloned().unwrap_or_default();
    Ok(vec![
        AbiValue::string(message.nonce()),
        AbiValue::string(message.seller().as_str()),
        AbiValue::string(message.buyer().as_str()),
        term_value(message.asset()),
        term_value(message.settlement()),
        loan_terms_value(&loan),
        operation_params_value(params),
        AbiValue::Bytes(signature_bytes(signed)?),
        execution_context_value(ctx),
    ])
}
