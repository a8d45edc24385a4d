use httpmock::prelude::*;
use raspisanie::{
    get_provider, Config, HttpFetcher, Provider, ScheduleData, ScheduleError, ScheduleProvider,
    WeekType,
};
use std::sync::Arc;

const LISTING: &str = r#"<html><body><ul>
    <li><a href="4101/">ИВТ-21б</a></li>
    <li><a href="4102/">ПС-11а</a></li>
</ul></body></html>"#;

const GROUP_PAGE: &str = r#"<html><body><div id="all_weeks">
  <h3 class="rasp-weekday-title">Понедельник</h3>
  <table>
    <tr>
      <td class="time-hour">1 пара</td>
      <td class="time-weektype">ч</td>
      <td class="time-discipline"><span class="event-type" title="Практика">Пр</span>Базы данных</td>
      <td class="time-room"><a href="/rasp/rooms/9/">9-101</a></td>
      <td class="time-prepod"><p><span class="prepod-title">доцент</span><a href="/rasp/prepods/3/">Смирнова А. В.</a></p></td>
    </tr>
    <tr>
      <td class="time-weektype">з</td>
      <td class="time-discipline">Базы данных</td>
    </tr>
  </table>
</div></body></html>"#;

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.sources.table_groups_url = server.url("/rasp/groups/");
    config.sources.embedded_url_template = server.url("/raspisanie-{slug}");
    config
}

#[tokio::test]
async fn test_table_schedule_end_to_end() {
    let server = MockServer::start_async().await;
    let listing_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/rasp/groups/");
            then.status(200).body(LISTING);
        })
        .await;
    let group_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/rasp/groups/4102/");
            then.status(200).body(GROUP_PAGE);
        })
        .await;

    let config = config_for(&server);
    let fetcher = Arc::new(HttpFetcher::with_config(&config.fetcher).unwrap());
    let provider = get_provider("togu", fetcher, &config.sources).unwrap();
    assert!(matches!(provider, Provider::Table(_)));

    let schedule = match provider.get_schedule("пс-11а").await.unwrap() {
        ScheduleData::Table(schedule) => schedule,
        other => panic!("unexpected schedule: {other:?}"),
    };

    listing_mock.assert_async().await;
    group_mock.assert_async().await;

    assert_eq!(schedule.group, "ПС-11а");
    assert_eq!(schedule.group_id, "4102");
    assert_eq!(schedule.source, server.url("/rasp/groups/4102/"));

    let lessons = &schedule.days[0].lessons;
    assert_eq!(lessons.len(), 2);
    assert_eq!(lessons[0].subject.as_deref(), Some("Базы данных"));
    assert_eq!(lessons[0].lesson_type_full.as_deref(), Some("Практика"));
    assert_eq!(lessons[0].teachers[0].title.as_deref(), Some("доцент"));
    assert_eq!(lessons[0].teachers[0].url, Some(server.url("/rasp/prepods/3/")));
    assert_eq!(lessons[1].pair, lessons[0].pair);
    assert_eq!(lessons[1].week_type, Some(WeekType::Denominator));

    let json = serde_json::to_value(ScheduleData::Table(schedule)).unwrap();
    assert_eq!(json["days"][0]["lessons"][0]["week_type"], "числ.");
    assert_eq!(json["days"][0]["lessons"][0]["pair"]["time_range"], "08:30 - 10:00");
}

#[tokio::test]
async fn test_embedded_listing_and_schedule() {
    let server = MockServer::start_async().await;
    // Registered first so the query-specific mock wins over the bare page.
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/raspisanie-tpu")
                .query_param("group", "A-101");
            then.status(200).body(
                r#"<script>let scheduleData = [[{"date": "02.09", "time": "08:30", "classes": [{"name": "Химия"}]}]];</script>"#,
            );
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/raspisanie-tpu");
            then.status(200).body(
                r#"<script>let groups = [{"number": "A-101", "direction": "Химия"}, {"number": "B-202"}];</script>"#,
            );
        })
        .await;

    let config = config_for(&server);
    let fetcher = Arc::new(HttpFetcher::with_config(&config.fetcher).unwrap());
    let provider = get_provider("TPU", fetcher, &config.sources).unwrap();

    let lines: Vec<String> = provider
        .list_groups()
        .await
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(lines, vec!["A-101 (Химия)", "B-202"]);

    match provider.get_schedule("A-101").await.unwrap() {
        ScheduleData::Embedded(value) => assert_eq!(value[0][0]["classes"][0]["name"], "Химия"),
        other => panic!("unexpected schedule: {other:?}"),
    }
}

#[tokio::test]
async fn test_embedded_transport_error_names_url() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/raspisanie-tpu");
            then.status(503);
        })
        .await;

    let config = config_for(&server);
    let fetcher = Arc::new(HttpFetcher::with_config(&config.fetcher).unwrap());
    let provider = get_provider("tpu", fetcher, &config.sources).unwrap();

    match provider.list_groups().await {
        Err(ScheduleError::Transport { url, .. }) => {
            assert_eq!(url, server.url("/raspisanie-tpu"))
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
