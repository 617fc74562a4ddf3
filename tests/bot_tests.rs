//! # Bot Tests
//!
//! End-to-end message handling against a recording transport: routing,
//! delivery, the event log and the fallback to the main menu.

mod common;

use anyhow::Result;
use std::fs;
use teloxide::types::ChatId;

use common::{load_state, resource_tree, RecordingTransport, Sent, SentKeyboard, SharedBuffer};
use shora_bot::bot::delivery::{dispatch, start};
use shora_bot::dialogue::MenuState;
use shora_bot::log_analysis::{list_deliveries, parse_log};

const CHAT: ChatId = ChatId(42);

fn main_menu() -> Vec<String> {
    ["City alpha", "City beta", "Other cities", "Ads"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn text(text: &str, keyboard: SentKeyboard) -> Sent {
    Sent::Text {
        chat_id: CHAT,
        text: text.to_string(),
        keyboard,
    }
}

fn back_to_main(first: &str) -> Vec<Sent> {
    vec![
        text(first, SentKeyboard::Unchanged),
        text("Choose a city", SentKeyboard::Show(main_menu())),
    ]
}

#[tokio::test]
async fn test_start_welcomes_and_shows_main_menu() -> Result<()> {
    let dir = resource_tree();
    let events = SharedBuffer::default();
    let state = load_state(dir.path(), events.clone());
    let transport = RecordingTransport::default();

    let menu_state = start(&transport, &state, CHAT).await?;

    assert_eq!(menu_state, MenuState::Main);
    assert_eq!(transport.take(), back_to_main("Welcome"));
    assert!(events.lines()[0].ends_with("\t42:\tstarted the bot"));
    Ok(())
}

#[tokio::test]
async fn test_known_city_is_delivered_and_logged() -> Result<()> {
    let dir = resource_tree();
    let events = SharedBuffer::default();
    let state = load_state(dir.path(), events.clone());
    let transport = RecordingTransport::default();

    for city in ["alpha", "beta", "gamma"] {
        let menu_state = dispatch(&transport, &state, CHAT, &format!("City {city}")).await?;
        assert_eq!(menu_state, MenuState::Idle);

        let sent = transport.take();
        assert_eq!(
            sent,
            vec![
                Sent::Image {
                    chat_id: CHAT,
                    file_name: format!("{city}.png"),
                    bytes: city.as_bytes().to_vec(),
                    caption: format!("Candidates of {city}"),
                },
                text("Thanks", SentKeyboard::Remove),
            ]
        );

        let lines = events.lines();
        assert!(lines
            .iter()
            .any(|line| line.ends_with(&format!("\t42:\tgot list for {city}"))));
    }
    Ok(())
}

#[tokio::test]
async fn test_unknown_city_falls_back_to_main_menu() -> Result<()> {
    let dir = resource_tree();
    let events = SharedBuffer::default();
    let state = load_state(dir.path(), events.clone());
    let transport = RecordingTransport::default();

    for city in ["zzz", "omega", "nowhere", ""] {
        let menu_state = dispatch(&transport, &state, CHAT, &format!("City {city}")).await?;
        assert_eq!(menu_state, MenuState::Main);
        assert_eq!(transport.take(), back_to_main("Wrong input"));
    }

    assert!(!events
        .lines()
        .iter()
        .any(|line| line.contains("got list for")));
    Ok(())
}

#[tokio::test]
async fn test_back_always_returns_main_menu() -> Result<()> {
    let dir = resource_tree();
    let state = load_state(dir.path(), SharedBuffer::default());
    let transport = RecordingTransport::default();

    // From the provinces menu, a province menu, the ads menu and after a delivery
    for previous in ["Other cities", "Province P3", "Ads", "City alpha"] {
        dispatch(&transport, &state, CHAT, previous).await?;
        transport.take();

        let menu_state = dispatch(&transport, &state, CHAT, "Back").await?;
        assert_eq!(menu_state, MenuState::Main);
        assert_eq!(
            transport.take(),
            vec![text("Choose a city", SentKeyboard::Show(main_menu()))]
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_navigation_menus() -> Result<()> {
    let dir = resource_tree();
    let state = load_state(dir.path(), SharedBuffer::default());
    let transport = RecordingTransport::default();

    let menu_state = dispatch(&transport, &state, CHAT, "Other cities").await?;
    assert_eq!(menu_state, MenuState::Provinces);
    assert_eq!(
        transport.take(),
        vec![text(
            "Choose a province",
            SentKeyboard::Show(vec![
                "Province Islands".to_string(),
                "Province P1".to_string(),
                "Province P3".to_string(),
                "Back".to_string(),
            ])
        )]
    );

    let menu_state = dispatch(&transport, &state, CHAT, "Province P3").await?;
    assert_eq!(
        menu_state,
        MenuState::ProvinceCities {
            province: "P3".to_string()
        }
    );
    assert_eq!(
        transport.take(),
        vec![text(
            "Choose a city of the province",
            SentKeyboard::Show(vec![
                "City beta".to_string(),
                "City gamma".to_string(),
                "Other cities".to_string(),
            ])
        )]
    );

    // P2 has no resolvable city and is not a province at all
    let menu_state = dispatch(&transport, &state, CHAT, "Province P2").await?;
    assert_eq!(menu_state, MenuState::Main);
    assert_eq!(transport.take(), back_to_main("Wrong input"));

    let menu_state = dispatch(&transport, &state, CHAT, "Ads").await?;
    assert_eq!(menu_state, MenuState::Ads);
    assert_eq!(
        transport.take(),
        vec![text(
            "Choose an ad",
            SentKeyboard::Show(vec!["Ad sale".to_string(), "Back".to_string()])
        )]
    );
    Ok(())
}

#[tokio::test]
async fn test_bare_names_are_accepted() -> Result<()> {
    let dir = resource_tree();
    let state = load_state(dir.path(), SharedBuffer::default());
    let transport = RecordingTransport::default();

    let menu_state = dispatch(&transport, &state, CHAT, "gamma").await?;
    assert_eq!(menu_state, MenuState::Idle);
    assert!(matches!(transport.take()[0], Sent::Image { .. }));

    let menu_state = dispatch(&transport, &state, CHAT, "P1").await?;
    assert_eq!(
        menu_state,
        MenuState::ProvinceCities {
            province: "P1".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_arabic_glyph_variants_match_persian_names() -> Result<()> {
    let dir = resource_tree();
    let events = SharedBuffer::default();
    let state = load_state(dir.path(), events.clone());
    let transport = RecordingTransport::default();

    // Arabic Kaf and Yeh typed instead of Keheh and Farsi Yeh
    let typed = "City \u{0643}\u{064A}\u{0634}";
    let menu_state = dispatch(&transport, &state, CHAT, typed).await?;

    assert_eq!(menu_state, MenuState::Idle);
    let sent = transport.take();
    assert!(matches!(
        &sent[0],
        Sent::Image { caption, .. } if caption == "Candidates of \u{06A9}\u{06CC}\u{0634}"
    ));
    // The normalized text is what gets logged
    assert!(events
        .lines()
        .iter()
        .any(|line| line.ends_with("\tCity \u{06A9}\u{06CC}\u{0634}")));
    Ok(())
}

#[tokio::test]
async fn test_ad_is_delivered_then_main_menu() -> Result<()> {
    let dir = resource_tree();
    let events = SharedBuffer::default();
    let state = load_state(dir.path(), events.clone());
    let transport = RecordingTransport::default();

    let menu_state = dispatch(&transport, &state, CHAT, "Ad sale").await?;
    assert_eq!(menu_state, MenuState::Main);

    let sent = transport.take();
    assert_eq!(
        sent,
        vec![
            Sent::Image {
                chat_id: CHAT,
                file_name: "sale.jpg".to_string(),
                bytes: b"sale-image".to_vec(),
                caption: "Half price\n\n@shora".to_string(),
            },
            text("Choose a city", SentKeyboard::Show(main_menu())),
        ]
    );
    assert!(events
        .lines()
        .iter()
        .any(|line| line.ends_with("\t42:\tgot ad sale")));
    Ok(())
}

#[tokio::test]
async fn test_unpaired_ads_are_invalid_input() -> Result<()> {
    let dir = resource_tree();
    let state = load_state(dir.path(), SharedBuffer::default());
    let transport = RecordingTransport::default();

    for ad in ["orphan-media", "orphan-text"] {
        dispatch(&transport, &state, CHAT, &format!("Ad {ad}")).await?;
        assert_eq!(transport.take(), back_to_main("Wrong input"));
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_files_at_send_time_are_reported() -> Result<()> {
    let dir = resource_tree();
    let events = SharedBuffer::default();
    let state = load_state(dir.path(), events.clone());
    let transport = RecordingTransport::default();

    fs::remove_file(dir.path().join("lists/alpha.png"))?;
    fs::remove_file(dir.path().join("ads/media/sale.jpg"))?;

    let menu_state = dispatch(&transport, &state, CHAT, "City alpha").await?;
    assert_eq!(menu_state, MenuState::Main);
    assert_eq!(transport.take(), back_to_main("Wrong input"));

    // The ad text still loads, but nothing is sent without its media
    let menu_state = dispatch(&transport, &state, CHAT, "Ad sale").await?;
    assert_eq!(menu_state, MenuState::Main);
    assert_eq!(transport.take(), back_to_main("Wrong input"));

    assert!(!events
        .lines()
        .iter()
        .any(|line| line.contains("got list for") || line.contains("got ad")));
    Ok(())
}

#[tokio::test]
async fn test_unavailable_label_is_used_when_configured() -> Result<()> {
    let dir = resource_tree();
    let config = common::CONFIG_JSON.replace(
        "\"tnx\": \"Thanks\",",
        "\"tnx\": \"Thanks\", \"unavailable\": \"Not available\",",
    );
    fs::write(dir.path().join("config.json"), config)?;

    let state = load_state(dir.path(), SharedBuffer::default());
    let transport = RecordingTransport::default();

    // Removed after loading, so beta is still on the menu
    fs::remove_file(dir.path().join("lists/beta.png"))?;

    let menu_state = dispatch(&transport, &state, CHAT, "City beta").await?;
    assert_eq!(menu_state, MenuState::Main);
    assert_eq!(transport.take(), back_to_main("Not available"));
    Ok(())
}

#[tokio::test]
async fn test_multiline_input_is_logged_as_one_event() -> Result<()> {
    let dir = resource_tree();
    let events = SharedBuffer::default();
    let state = load_state(dir.path(), events.clone());
    let transport = RecordingTransport::default();

    let typed = "hello\n2020/02/14 09:11:00\t999:\tgot list for alpha\n\
                 0001/01/01 00:00:00\t1:\tgot list for beta";
    let menu_state = dispatch(&transport, &state, CHAT, typed).await?;
    assert_eq!(menu_state, MenuState::Main);
    assert_eq!(transport.take(), back_to_main("Wrong input"));

    let lines = events.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].matches('\t').count(), 2);
    assert!(lines[0].contains("\t42:\thello\\n2020/02/14 09:11:00\\t999:"));

    let deliveries = list_deliveries(&parse_log(&lines.join("\n")));
    assert!(deliveries.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_gibberish_is_invalid_input() -> Result<()> {
    let dir = resource_tree();
    let state = load_state(dir.path(), SharedBuffer::default());
    let transport = RecordingTransport::default();

    for input in ["hello", "what is this", "   "] {
        let menu_state = dispatch(&transport, &state, CHAT, input).await?;
        assert_eq!(menu_state, MenuState::Main);
        assert_eq!(transport.take(), back_to_main("Wrong input"));
    }
    Ok(())
}
