use super::*;

fn card(i: usize) -> SavedCard {
    let png = crate::export::image::encode_png(1, 1, &[0, 0, 0, 255]).unwrap();
    SavedCard {
        id: AssetId::new(format!("card-{i}")),
        name: format!("Card {i}"),
        created_at_ms: i as u64,
        image: ImagePayload::from_bytes(png).unwrap(),
    }
}

#[test]
fn newest_first_and_bounded() {
    let mut cards = SavedCards::new();
    for i in 0..MAX_SAVED_CARDS {
        assert!(cards.push(card(i)).is_none());
    }
    assert_eq!(cards.len(), MAX_SAVED_CARDS);

    let evicted = cards.push(card(MAX_SAVED_CARDS)).unwrap();
    assert_eq!(evicted.id.as_str(), "card-0");
    assert_eq!(cards.len(), MAX_SAVED_CARDS);
    assert_eq!(cards.iter().next().unwrap().id.as_str(), "card-20");
    assert!(cards.get(&AssetId::new("card-0")).is_none());
}

#[test]
fn from_vec_truncates_to_limit() {
    let cards = SavedCards::from_vec((0..25).map(card).collect());
    assert_eq!(cards.len(), MAX_SAVED_CARDS);
    assert_eq!(cards.iter().next().unwrap().id.as_str(), "card-0");
}

#[test]
fn remove_by_id() {
    let mut cards = SavedCards::new();
    cards.push(card(1));
    cards.push(card(2));
    assert!(cards.remove(&AssetId::new("card-1")).is_some());
    assert!(cards.remove(&AssetId::new("card-1")).is_none());
    assert_eq!(cards.len(), 1);
}
