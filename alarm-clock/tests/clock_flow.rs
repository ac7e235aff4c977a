use alarm_clock::alarm::Alarm;
use alarm_clock::calendar::{self, DEFAULT_PRODID};
use alarm_clock::editor::AlarmEditor;
use alarm_clock::scheduler::AlarmScheduler;
use alarm_clock::AlarmQueue;
use alarm_queue::QueueError;
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn ms(d: u32, h: u32, m: u32) -> i64 {
    Utc.with_ymd_and_hms(2030, 1, d, h, m, 0)
        .unwrap()
        .timestamp_millis()
}

#[test]
fn load_edit_fire_and_save() {
    let now = Utc.with_ymd_and_hms(2030, 1, 1, 6, 0, 0).unwrap();
    let queue = AlarmQueue::new();

    // ── Rehydrate from a calendar with one past and three future events ───────
    let stamp = Utc.with_ymd_and_hms(2029, 12, 31, 0, 0, 0).unwrap();
    let text = calendar::generate(
        &[ms(1, 5, 0), ms(1, 7, 0), ms(1, 9, 0), ms(2, 7, 0)],
        &stamp,
        DEFAULT_PRODID,
    )
    .unwrap();
    let report = calendar::load_into(&queue, &text, now.timestamp_millis()).unwrap();
    assert_eq!((report.loaded, report.skipped), (3, 1));

    // ── Edit: move 09:00 to 08:00 ─────────────────────────────────────────────
    let editor = AlarmEditor::new(queue.clone());
    let list = editor.list();
    assert_eq!(list.rows()[1].fire_at_ms, ms(1, 9, 0));
    editor.edit(&list, 1, 8, 0, &now).unwrap();
    assert_eq!(
        queue.keys_ascending(),
        vec![ms(1, 7, 0), ms(1, 8, 0), ms(2, 7, 0)]
    );

    // ── Scheduler fires 07:00 only ────────────────────────────────────────────
    let fired = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&fired);
    let scheduler = AlarmScheduler::new(
        queue.clone(),
        move |a: &Alarm| sink.lock().unwrap().push(a.fire_at_ms()),
        Duration::from_secs(1),
    );
    scheduler.check_alarms(ms(1, 7, 30));
    assert_eq!(*fired.lock().unwrap(), vec![ms(1, 7, 0)]);

    // A list taken before the alarm fired can no longer remove by rank.
    let stale = list;
    assert!(matches!(
        editor.remove(&stale, 0),
        Err(alarm_clock::editor::EditError::Queue(QueueError::StaleSnapshot { .. }))
    ));

    // ── Save and reload into a fresh queue ────────────────────────────────────
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("alarms.ics");
    calendar::save_to_file(&path, &queue, DEFAULT_PRODID).unwrap();

    let restored = AlarmQueue::new();
    calendar::load_from_file(&path, &restored, ms(1, 7, 30)).unwrap();
    assert_eq!(restored.keys_ascending(), queue.keys_ascending());
}
