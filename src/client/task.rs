// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ethers::providers::Middleware;
use ethers::types::{Address, H256, U256};
use futures::future::try_join_all;
use std::convert::TryFrom;
use std::sync::Arc;
use tracing::{debug, info};

use super::error::{ClientError, ClientResult};
use super::types::{Response, ResponseStatus, TaskInfo, TaskStatus};
use super::OgpuClient;
use crate::contracts::client::find_event;
use crate::contracts::types::{Controller, ResponseContract, TaskContract, TaskPublishedFilter};

impl OgpuClient {
    /// Publish a task, paying `task_info.payment`, and return the task address
    pub async fn publish_task(&self, task_info: &TaskInfo) -> ClientResult<Address> {
        task_info.validate()?;
        let controller_address = self.chain.controller_address()?;
        let signer = self.web3.signer()?;

        let config = serde_json::to_value(&task_info.config)
            .map_err(|e| ClientError::Metadata(e.to_string()))?;
        let config_url = self.uploader.upload(&config).await?;

        info!(
            "Publishing task '{}' to source {:?} with payment {} wei",
            task_info.config.function_name, task_info.source, task_info.payment
        );

        let controller = Controller::new(controller_address, signer);
        let call = controller
            .publish_task(task_info.to_params(config_url))
            .value(task_info.payment);
        let receipt = self.web3.send_and_confirm(call, "publishTask").await?;

        let event: TaskPublishedFilter = find_event(&receipt, controller_address)?;
        info!("Task published at {:?}", event.task);
        Ok(event.task)
    }

    /// Confirm a response, returning the transaction hash
    pub async fn confirm_response(&self, response_address: Address) -> ClientResult<H256> {
        let controller = Controller::new(self.chain.controller_address()?, self.web3.signer()?);
        let receipt = self
            .web3
            .send_and_confirm(controller.confirm_response(response_address), "confirmResponse")
            .await?;
        info!("Response {:?} confirmed", response_address);
        Ok(receipt.transaction_hash)
    }

    pub async fn cancel_task(&self, task_address: Address) -> ClientResult<H256> {
        let controller = Controller::new(self.chain.controller_address()?, self.web3.signer()?);
        let receipt = self
            .web3
            .send_and_confirm(controller.cancel_task(task_address), "cancelTask")
            .await?;
        info!("Task {:?} canceled", task_address);
        Ok(receipt.transaction_hash)
    }

    pub async fn get_task_responses(&self, task_address: Address) -> ClientResult<Vec<Response>> {
        fetch_task_responses(self.web3.provider.clone(), task_address).await
    }

    pub async fn get_confirmed_response(&self, task_address: Address) -> ClientResult<Response> {
        fetch_confirmed_response(self.web3.provider.clone(), task_address).await
    }

    pub async fn get_task_status(&self, task_address: Address) -> ClientResult<TaskStatus> {
        fetch_task_status(self.web3.provider.clone(), task_address).await
    }
}

/// All responses submitted for a task, in contract order
pub async fn fetch_task_responses<M: Middleware + 'static>(
    client: Arc<M>,
    task_address: Address,
) -> ClientResult<Vec<Response>> {
    let task = TaskContract::new(task_address, client.clone());
    let addresses = task
        .get_responses()
        .call()
        .await
        .map_err(ClientError::contract)?;
    debug!("Task {:?} has {} responses", task_address, addresses.len());

    try_join_all(
        addresses
            .into_iter()
            .map(|address| fetch_response(client.clone(), address)),
    )
    .await
}

pub async fn fetch_confirmed_response<M: Middleware + 'static>(
    client: Arc<M>,
    task_address: Address,
) -> ClientResult<Response> {
    let task = TaskContract::new(task_address, client.clone());
    let confirmed = task
        .get_confirmed_response()
        .call()
        .await
        .map_err(ClientError::contract)?;

    if confirmed.is_zero() {
        return Err(ClientError::NoConfirmedResponse(task_address));
    }
    fetch_response(client, confirmed).await
}

pub async fn fetch_task_status<M: Middleware + 'static>(
    client: Arc<M>,
    task_address: Address,
) -> ClientResult<TaskStatus> {
    let status = TaskContract::new(task_address, client)
        .get_status()
        .call()
        .await
        .map_err(ClientError::contract)?;
    TaskStatus::try_from(status)
}

pub async fn fetch_response<M: Middleware + 'static>(
    client: Arc<M>,
    address: Address,
) -> ClientResult<Response> {
    let contract = ResponseContract::new(address, client);
    let params_call = contract.get_response_params();
    let status_call = contract.get_status();
    let timestamp_call = contract.get_timestamp();
    let confirmed_call = contract.confirmed_flag();

    let ((task, provider, data, payment), status, timestamp, confirmed) = tokio::try_join!(
        params_call.call(),
        status_call.call(),
        timestamp_call.call(),
        confirmed_call.call(),
    )
    .map_err(ClientError::contract)?;

    Ok(Response {
        address,
        task,
        provider,
        data,
        payment,
        status: ResponseStatus::try_from(status)?,
        timestamp: u256_to_u64(timestamp, "timestamp")?,
        confirmed,
    })
}

fn u256_to_u64(value: U256, field: &str) -> ClientResult<u64> {
    if value > U256::from(u64::MAX) {
        return Err(ClientError::Decode(format!("{} {} overflows u64", field, value)));
    }
    Ok(value.as_u64())
}
