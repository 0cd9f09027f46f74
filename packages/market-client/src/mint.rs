//! Minting a new item into the collection.

use crate::error::Error;
use crate::guard::{ActionKey, ActionKind};
use crate::notify::Notice;
use crate::session::{Outcome, Session};
use market_types::{AssetMetadata, ImageSource};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintForm {
    pub name: String,
    pub description: String,
    pub image: Option<ImageSource>,
}

/// Whether the connected wallet may mint. False without a wallet or collection.
pub async fn can_mint(session: &Session) -> Result<bool, Error> {
    let (Some(address), Some(collection)) = (session.address(), session.collection()) else {
        return Ok(false);
    };
    collection
        .has_minter_role(&address)
        .await
        .map_err(Error::Query)
}

/// Mint the item to the connected wallet.
pub async fn mint_item(session: &Session, form: MintForm) -> Result<Outcome, Error> {
    let (Some(owner), Some(collection)) = (session.address(), session.collection()) else {
        session.notify(Notice::Error(
            "Make sure you are connected with your wallet".into(),
        ));
        return Err(Error::PreconditionUnmet(
            "wallet or collection not connected".into(),
        ));
    };
    let Some(image) = form.image else {
        session.notify(Notice::Error("Please select an image".into()));
        return Err(Error::PreconditionUnmet("no image selected".into()));
    };

    if !collection
        .has_minter_role(&owner)
        .await
        .map_err(Error::Query)?
    {
        warn!(address = %owner, "Mint attempted without minter role");
        session.notify(Notice::Error(
            "You do not have permission to add an item to the collection".into(),
        ));
        return Err(Error::Unauthorized(format!("{owner} lacks the minter role")));
    }

    let metadata = AssetMetadata {
        name: form.name,
        description: form.description,
        image,
    };
    info!(owner = %owner, name = %metadata.name, "Minting item");
    session
        .execute(
            ActionKey::global(ActionKind::Mint),
            Some(Notice::Loading("Processing...".into())),
            collection.mint_to(&owner, metadata),
        )
        .await
}
