use anyhow::Result;
use sui_rpc::client::v2::Client as GrpcClient;
use sui_rpc::proto::sui::rpc::v2 as proto;
use sui_sdk_types as sui;
use tracing::debug;

/// Get reference gas price from the network
pub async fn get_reference_gas_price(client: &mut GrpcClient) -> Result<u64> {
    let mut ledger = client.ledger_client();
    let _resp = ledger
        .get_service_info(proto::GetServiceInfoRequest::default())
        .await?
        .into_inner();
    // ServiceInfo does not expose gas price yet; default to 1000
    let price = 1_000u64;
    debug!("Using reference gas price: {}", price);
    Ok(price)
}

/// Pick a gas object owned by the sender
pub async fn pick_gas_object(
    client: &mut GrpcClient,
    sender: sui::Address,
) -> Result<sui::ObjectReference> {
    let mut state = client.state_client();
    debug!("Listing owned objects for sender: {}", sender);

    let mut req = proto::ListOwnedObjectsRequest::default();
    req.owner = Some(sender.to_string());
    req.page_size = Some(100);
    req.page_token = None;
    req.read_mask = Some(prost_types::FieldMask {
        paths: vec![
            "object_id".into(),
            "version".into(),
            "digest".into(),
            "object_type".into(),
        ],
    });
    req.object_type = None;
    let resp = state.list_owned_objects(req).await?.into_inner();

    debug!("Owned objects returned: {}", resp.objects.len());

    let mut obj = resp
        .objects
        .into_iter()
        .find(|o| {
            o.object_type
                .as_ref()
                .map(|t| t.contains("::sui::SUI"))
                .unwrap_or(true)
        })
        .ok_or_else(|| anyhow::anyhow!("no owned objects to use as gas"))?;

    debug!(object = ?obj, "Selected object");

    if obj.digest.is_none() || obj.version.is_none() {
        debug!("Digest/version missing; fetching object details");
        let mut ledger = client.ledger_client();
        let object_id_str = obj
            .object_id
            .clone()
            .ok_or_else(|| anyhow::anyhow!("missing object id"))?;
        let mut get_req = proto::GetObjectRequest::default();
        get_req.object_id = Some(object_id_str.clone());
        get_req.version = None;
        get_req.read_mask = None;
        let got = ledger.get_object(get_req).await?.into_inner();

        if let Some(full) = got.object {
            debug!(object = ?full, "GetObject response");
            obj.object_id = full.object_id;
            obj.version = full.version;
            obj.digest = full.digest;
        }
    }

    let id = obj
        .object_id
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("missing object id"))?
        .parse()?;
    let version = obj
        .version
        .ok_or_else(|| anyhow::anyhow!("missing version"))?;
    let digest = obj
        .digest
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("missing digest"))?
        .parse()?;

    debug!("Gas coin chosen: id={}, version={}, digest={}", id, version, digest);
    Ok(sui::ObjectReference::new(id, version, digest))
}

/// Count objects owned by an address. Used by wallet recovery to tell which
/// candidate address has ever been funded on chain.
pub async fn count_owned_objects(client: &mut GrpcClient, owner: sui::Address) -> Result<usize> {
    let mut state = client.state_client();
    let mut req = proto::ListOwnedObjectsRequest::default();
    req.owner = Some(owner.to_string());
    req.page_size = Some(1);
    req.page_token = None;
    req.read_mask = Some(prost_types::FieldMask {
        paths: vec!["object_id".into()],
    });
    req.object_type = None;
    let resp = state.list_owned_objects(req).await?.into_inner();
    Ok(resp.objects.len())
}
