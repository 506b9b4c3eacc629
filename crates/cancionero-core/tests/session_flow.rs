use cancionero_core::session::{
    Session, SessionPhase, STATUS_LOAD_ERROR, STATUS_NO_MATCHES, STATUS_READY,
};
use cancionero_core::song::Song;

fn fixture_catalog() -> Vec<Song> {
    let rows = [
        (1, "Pescador de hombres", "Tú has venido a la orilla"),
        (2, "Alma misionera", "Señor, toma mi vida nueva"),
        (3, "Canción del misionero", "Tú, Señor, me has mirado a los ojos"),
        (4, "Aleluya", ""),
    ];
    rows.iter()
        .map(|(id, title, body)| Song {
            id: *id,
            number: *id,
            title: title.to_string(),
            file: format!("{:03}.txt", id),
            body: body.to_string(),
        })
        .collect()
}

#[test]
fn full_flow_from_load_through_filter_to_selection() {
    let mut session = Session::new();
    assert_eq!(*session.phase(), SessionPhase::Loading);

    session.catalog_loaded(fixture_catalog());
    let plan = session.render(true);
    assert_eq!(plan.status, STATUS_READY);
    assert_eq!(plan.count, "4 / 4");
    assert_eq!(plan.rows[0].label, "1. Pescador de hombres");
    assert_eq!(session.selected_id(), Some(1));

    // accent-insensitive query narrows the view and drags the selection along
    session.set_query("senor");
    let plan = session.render(true);
    assert_eq!(plan.count, "2 / 4");
    assert_eq!(plan.rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
    assert_eq!(
        session.song_at_view(1).map(|s| s.title.as_str()),
        Some("Canción del misionero")
    );
    assert_eq!(session.selected_id(), Some(2));
    assert_eq!(plan.detail.as_ref().unwrap().title, "2. Alma misionera");

    // explicit selection of the other visible song
    assert!(session.select(3));
    let plan = session.render(true);
    assert!(plan.rows[1].active);
    assert_eq!(plan.detail.unwrap().title, "3. Canción del misionero");

    // widening the query keeps the selection in place
    session.set_query("");
    assert_eq!(session.selected_id(), Some(3));
    assert_eq!(session.filtered_len(), 4);
}

#[test]
fn no_match_query_empties_the_view_and_hides_detail() {
    let mut session = Session::new();
    session.catalog_loaded(fixture_catalog());
    session.set_query("zzz_no_such_text");

    let plan = session.render(true);
    assert!(plan.rows.is_empty());
    assert!(!plan.detail_visible);
    assert_eq!(plan.status, STATUS_NO_MATCHES);
    assert_eq!(plan.count, "0 / 4");

    // every filtered view is drawn from the catalog, never invented
    session.set_query("misionero");
    for row in session.render(true).rows {
        assert!(session.catalog().iter().any(|s| s.id == row.id));
    }
}

#[test]
fn load_failure_is_terminal_until_reload() {
    let mut session = Session::new();
    session.load_failed();
    assert_eq!(*session.phase(), SessionPhase::LoadError);
    assert_eq!(session.render(true).status, STATUS_LOAD_ERROR);

    // query input while failed changes nothing visible
    session.set_query("aleluya");
    assert_eq!(*session.phase(), SessionPhase::LoadError);
    assert_eq!(session.render(true).rows.len(), 0);

    // a reload starts a fresh session
    session.begin_reload();
    assert_eq!(*session.phase(), SessionPhase::Loading);
    session.catalog_loaded(fixture_catalog());
    assert_eq!(session.render(true).status, STATUS_READY);
}
