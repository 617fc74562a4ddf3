//! Delivery actions: what the bot sends back for each route.
//!
//! Every action returns the [`MenuState`] the chat ends up in.

use std::path::Path;
use teloxide::types::ChatId;
use tracing::{debug, info, warn};

use crate::dialogue::MenuState;
use crate::errors::{Result, ShoraError};
use crate::router::{route, Route};
use crate::text_processing::normalize;

use super::transport::{ChatTransport, Keyboard, Photo};
use super::BotState;

/// Read a resource file, mapping any failure to `ResourceUnavailable`
pub async fn read_resource(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ShoraError::ResourceUnavailable {
            path: path.to_path_buf(),
            source,
        })
}

async fn load_photo(path: &Path) -> Result<Photo> {
    let bytes = read_resource(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    Ok(Photo { file_name, bytes })
}

async fn load_text(path: &Path) -> Result<String> {
    let bytes = read_resource(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Greet a new user and show the main menu
pub async fn start<T: ChatTransport + ?Sized>(
    transport: &T,
    state: &BotState,
    chat_id: ChatId,
) -> Result<MenuState> {
    state.events.record(Some(chat_id.0), "started the bot");
    transport
        .send_text(chat_id, &state.labels.welcome, Keyboard::Unchanged)
        .await?;
    select_main(transport, state, chat_id).await
}

/// Normalize, log and route one incoming text, then act on it
pub async fn dispatch<T: ChatTransport + ?Sized>(
    transport: &T,
    state: &BotState,
    chat_id: ChatId,
    text: &str,
) -> Result<MenuState> {
    let text = normalize(text);
    state.events.record(Some(chat_id.0), &text);

    let route = route(&text, &state.labels, &state.catalog);
    debug!(chat_id = %chat_id, route = ?route, "Routed incoming text");

    match route {
        Route::ShowProvinces => send_provinces(transport, state, chat_id).await,
        Route::ShowMain => select_main(transport, state, chat_id).await,
        Route::ShowAds => select_ads(transport, state, chat_id).await,
        Route::CityList(city) => send_list(transport, state, chat_id, &city).await,
        Route::ProvinceCities(province) => {
            send_province_cities(transport, state, chat_id, &province).await
        }
        Route::Ad(ad) => send_ad(transport, state, chat_id, &ad).await,
        Route::Invalid => handle_wrong_input(transport, state, chat_id).await,
    }
}

pub async fn select_main<T: ChatTransport + ?Sized>(
    transport: &T,
    state: &BotState,
    chat_id: ChatId,
) -> Result<MenuState> {
    transport
        .send_text(
            chat_id,
            &state.labels.select_main,
            Keyboard::Show(&state.menus.main),
        )
        .await?;
    Ok(MenuState::Main)
}

pub async fn send_provinces<T: ChatTransport + ?Sized>(
    transport: &T,
    state: &BotState,
    chat_id: ChatId,
) -> Result<MenuState> {
    transport
        .send_text(
            chat_id,
            &state.labels.select_province,
            Keyboard::Show(&state.menus.provinces),
        )
        .await?;
    Ok(MenuState::Provinces)
}

pub async fn select_ads<T: ChatTransport + ?Sized>(
    transport: &T,
    state: &BotState,
    chat_id: ChatId,
) -> Result<MenuState> {
    transport
        .send_text(chat_id, &state.labels.select_ad, Keyboard::Show(&state.menus.ads))
        .await?;
    Ok(MenuState::Ads)
}

/// Unknown input: say so and go back to the main menu
pub async fn handle_wrong_input<T: ChatTransport + ?Sized>(
    transport: &T,
    state: &BotState,
    chat_id: ChatId,
) -> Result<MenuState> {
    transport
        .send_text(chat_id, &state.labels.wrong_input, Keyboard::Unchanged)
        .await?;
    select_main(transport, state, chat_id).await
}

/// A known entry whose file cannot be read: tell the user and go back to the main menu
pub async fn handle_unavailable<T: ChatTransport + ?Sized>(
    transport: &T,
    state: &BotState,
    chat_id: ChatId,
    error: &ShoraError,
) -> Result<MenuState> {
    warn!(chat_id = %chat_id, error = %error, "Catalog resource unavailable");
    transport
        .send_text(chat_id, state.labels.unavailable(), Keyboard::Unchanged)
        .await?;
    select_main(transport, state, chat_id).await
}

/// Send a city's list image, thank the user and remove the keyboard
pub async fn send_list<T: ChatTransport + ?Sized>(
    transport: &T,
    state: &BotState,
    chat_id: ChatId,
    city: &str,
) -> Result<MenuState> {
    let Some(path) = state.catalog.city_list(city) else {
        return handle_wrong_input(transport, state, chat_id).await;
    };

    let photo = match load_photo(path).await {
        Ok(photo) => photo,
        Err(e) => return handle_unavailable(transport, state, chat_id, &e).await,
    };

    let caption = state.labels.list_caption(city);
    transport.send_image(chat_id, photo, &caption).await?;
    state.events.list_delivered(chat_id.0, city);
    info!(chat_id = %chat_id, city, "City list delivered");

    transport
        .send_text(chat_id, &state.labels.tnx, Keyboard::Remove)
        .await?;
    Ok(MenuState::Idle)
}

/// Show the city keyboard of a province
pub async fn send_province_cities<T: ChatTransport + ?Sized>(
    transport: &T,
    state: &BotState,
    chat_id: ChatId,
    province: &str,
) -> Result<MenuState> {
    let Some(menu) = state.menus.for_province(province) else {
        return handle_wrong_input(transport, state, chat_id).await;
    };

    transport
        .send_text(chat_id, &state.labels.select_city, Keyboard::Show(menu))
        .await?;
    Ok(MenuState::ProvinceCities {
        province: province.to_string(),
    })
}

/// Send an ad image captioned with its text, then show the main menu
pub async fn send_ad<T: ChatTransport + ?Sized>(
    transport: &T,
    state: &BotState,
    chat_id: ChatId,
    ad: &str,
) -> Result<MenuState> {
    let Some(entry) = state.catalog.ad(ad) else {
        return handle_wrong_input(transport, state, chat_id).await;
    };

    // Both files are read before anything is sent
    let loaded = async {
        let text = load_text(&entry.text).await?;
        let photo = load_photo(&entry.media).await?;
        Ok::<_, ShoraError>((text, photo))
    }
    .await;
    let (text, photo) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => return handle_unavailable(transport, state, chat_id, &e).await,
    };

    let caption = state.labels.ad_caption(&text);
    transport.send_image(chat_id, photo, &caption).await?;
    state.events.ad_delivered(chat_id.0, ad);
    info!(chat_id = %chat_id, ad, "Ad delivered");

    select_main(transport, state, chat_id).await
}
