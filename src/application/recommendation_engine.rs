// Recommendation engine - Rule-based action plan from a survey profile
use crate::domain::profile::{
    BucketCounts, Difficulty, MAX_WASTE_SCORE, Priority, Recommendation, RecommendationReport,
    UserProfile,
};

/// Regions treated as urban for the gardening-vs-forest recommendation.
pub const URBAN_REGIONS: &[&str] = &["서울", "부산", "대구", "인천", "광주", "대전", "울산"];

const CAR_TRANSPORT_KG: f64 = 50.0;
const OTHER_TRANSPORT_KG: f64 = 20.0;
const ELECTRICITY_KG_PER_KWH: f64 = 0.5;
const WASTE_KG_PER_POINT: f64 = 30.0;

const HIGH_ELECTRICITY_KWH: f64 = 400.0;
const LOW_WASTE_SCORE: u8 = 3;
const HIGH_STRESS_INDEX: f64 = 7.0;
const WIDE_ACTION_GAP: f64 = 3.0;
const YOUTH_AGE_LIMIT: u32 = 15;

pub fn carbon_estimate_kg(profile: &UserProfile) -> f64 {
    let per_mode = if profile.uses_car() {
        CAR_TRANSPORT_KG
    } else {
        OTHER_TRANSPORT_KG
    };
    let transport = profile.transport.len() as f64 * per_mode;
    let unsorted = MAX_WASTE_SCORE - profile.waste_score.min(MAX_WASTE_SCORE);

    transport
        + profile.electricity_usage * ELECTRICITY_KG_PER_KWH
        + f64::from(unsorted) * WASTE_KG_PER_POINT
}

pub fn stress_index(profile: &UserProfile) -> f64 {
    (f64::from(profile.concern_score) + f64::from(profile.future_anxiety_score)) / 2.0
}

pub fn action_gap(profile: &UserProfile) -> f64 {
    f64::from(profile.concern_score) - f64::from(profile.willingness_score)
}

pub fn is_urban(region: &str) -> bool {
    let region = region.trim();
    URBAN_REGIONS.iter().any(|urban| *urban == region)
}

/// Evaluate every rule in order. The output lists High, then Medium, then
/// Low, each bucket in rule order.
pub fn recommend(profile: &UserProfile) -> RecommendationReport {
    let carbon = carbon_estimate_kg(profile);
    let stress = stress_index(profile);
    let gap = action_gap(profile);

    let mut fired = Vec::new();

    if profile.uses_car() {
        fired.push(rec(
            Priority::High,
            "자가용 대신 대중교통·자전거 이용하기",
            "연간 CO₂ 약 1.2톤 감축",
            Difficulty::Medium,
            "가까운 거리는 걷거나 자전거로, 먼 거리는 버스와 지하철로 이동해 보세요. 가족과 주 1회 '차 없는 날'을 정하는 것도 좋아요.",
        ));
    }
    if profile.electricity_usage > HIGH_ELECTRICITY_KWH {
        fired.push(rec(
            Priority::High,
            "대기전력 차단하고 고효율 가전 쓰기",
            "월 전기 사용량 10~15% 절감",
            Difficulty::Easy,
            "멀티탭 스위치로 대기전력을 끄고, 냉난방 온도를 여름 26℃·겨울 20℃로 맞춰 보세요.",
        ));
    }
    if profile.waste_score < LOW_WASTE_SCORE {
        fired.push(rec(
            Priority::High,
            "분리배출 제대로 하기",
            "재활용률 향상으로 매립·소각 배출 감소",
            Difficulty::Easy,
            "비우고, 헹구고, 분리하고, 섞지 않기. 라벨을 떼고 용기를 깨끗이 헹궈서 배출해요.",
        ));
    }
    if stress > HIGH_STRESS_INDEX {
        fired.push(rec(
            Priority::High,
            "기후 불안 마음 돌보기",
            "불안감 완화와 지속 가능한 실천 동력 회복",
            Difficulty::Easy,
            "기후 뉴스를 보는 시간을 정하고, 불안한 마음을 친구나 상담 선생님과 나눠 보세요. 혼자가 아니라는 걸 아는 것만으로도 힘이 돼요.",
        ));
    }
    if gap > WIDE_ACTION_GAP {
        fired.push(rec(
            Priority::Medium,
            "작은 실천 하나부터 시작하기",
            "걱정을 행동으로 바꾸는 첫걸음",
            Difficulty::Easy,
            "일주일에 하나씩 실천 목표를 정하고 달력에 체크해 보세요. 작은 성공이 쌓이면 행동할 힘이 생겨요.",
        ));
    }
    if profile.age <= YOUTH_AGE_LIMIT {
        fired.push(rec(
            Priority::Medium,
            "학교 환경 동아리 참여하기",
            "또래와 함께하는 지속적인 기후 행동",
            Difficulty::Easy,
            "환경 동아리나 학생회 기후 캠페인에 참여해 급식 잔반 줄이기, 교실 소등 캠페인을 함께 해 보세요.",
        ));
    } else {
        fired.push(rec(
            Priority::Medium,
            "지역 기후 행동 캠페인 참여하기",
            "지역 사회 단위의 배출 감축 확산",
            Difficulty::Medium,
            "지역 환경 단체의 플로깅, 기후 행진, 정책 제안 활동에 참여해 목소리를 내 보세요.",
        ));
    }
    if is_urban(&profile.region) {
        fired.push(rec(
            Priority::Low,
            "도시 텃밭·옥상 정원 가꾸기",
            "도시 열섬 완화와 탄소 흡수",
            Difficulty::Medium,
            "학교나 아파트 옥상, 베란다에서 작은 화분부터 키워 보세요. 녹지가 늘면 폭염 체감온도도 낮아져요.",
        ));
    } else {
        fired.push(rec(
            Priority::Low,
            "지역 숲 가꾸기 봉사 참여하기",
            "산림 탄소 흡수원 보전",
            Difficulty::Medium,
            "가까운 숲이나 하천 정화 봉사에 참여해 보세요. 나무 한 그루는 1년에 약 6.6kg의 CO₂를 흡수해요.",
        ));
    }

    fired.push(rec(
        Priority::Medium,
        "주 1회 채식 식단 실천하기",
        "식단 관련 탄소 배출 감소",
        Difficulty::Easy,
        "급식이나 집밥에서 일주일에 한 끼는 고기 없이 먹어 보세요. 음식물 쓰레기를 남기지 않는 것도 중요해요.",
    ));
    fired.push(rec(
        Priority::Low,
        "텀블러·장바구니 들고 다니기",
        "일회용품 사용 감소",
        Difficulty::Easy,
        "가방에 텀블러와 접이식 장바구니를 넣어 두면 일회용 컵과 비닐봉지를 쉽게 줄일 수 있어요.",
    ));

    // Stable sort keeps rule order inside each bucket.
    fired.sort_by_key(|r| r.priority);

    let counts = fired.iter().fold(BucketCounts::default(), |mut acc, r| {
        match r.priority {
            Priority::High => acc.high += 1,
            Priority::Medium => acc.medium += 1,
            Priority::Low => acc.low += 1,
        }
        acc
    });

    RecommendationReport {
        recommendations: fired,
        carbon_estimate_kg: carbon,
        stress_index: stress,
        action_gap: gap,
        counts,
    }
}

fn rec(
    priority: Priority,
    action: &str,
    impact: &str,
    difficulty: Difficulty,
    detail: &str,
) -> Recommendation {
    Recommendation {
        action: action.to_string(),
        impact: impact.to_string(),
        difficulty,
        detail: detail.to_string(),
        priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::TransportMode;
    use std::collections::BTreeSet;

    fn student() -> UserProfile {
        UserProfile {
            age: 14,
            region: "서울".to_string(),
            transport: BTreeSet::from([TransportMode::Car]),
            electricity_usage: 500.0,
            waste_score: 2,
            concern_score: 9,
            future_anxiety_score: 8,
            willingness_score: 3,
        }
    }

    fn calm_adult() -> UserProfile {
        UserProfile {
            age: 17,
            region: "강원".to_string(),
            transport: BTreeSet::from([TransportMode::Walking, TransportMode::PublicTransit]),
            electricity_usage: 200.0,
            waste_score: 5,
            concern_score: 4,
            future_anxiety_score: 3,
            willingness_score: 6,
        }
    }

    fn actions(report: &RecommendationReport, priority: Priority) -> Vec<String> {
        report.by_priority(priority).map(|r| r.action.clone()).collect()
    }

    #[test]
    fn test_end_to_end_student_profile() {
        let report = recommend(&student());

        assert!((report.carbon_estimate_kg - 390.0).abs() < 1e-9);
        assert_eq!(report.stress_index, 8.5);
        assert_eq!(report.action_gap, 6.0);
        assert_eq!(report.counts.high, 4);
        assert_eq!(
            actions(&report, Priority::High),
            vec![
                "자가용 대신 대중교통·자전거 이용하기",
                "대기전력 차단하고 고효율 가전 쓰기",
                "분리배출 제대로 하기",
                "기후 불안 마음 돌보기",
            ]
        );
        assert_eq!(
            actions(&report, Priority::Medium),
            vec![
                "작은 실천 하나부터 시작하기",
                "학교 환경 동아리 참여하기",
                "주 1회 채식 식단 실천하기",
            ]
        );
        assert_eq!(
            actions(&report, Priority::Low),
            vec!["도시 텃밭·옥상 정원 가꾸기", "텀블러·장바구니 들고 다니기"]
        );
    }

    #[test]
    fn test_buckets_are_ordered_high_medium_low() {
        let report = recommend(&student());
        let priorities: Vec<Priority> = report.recommendations.iter().map(|r| r.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn test_electricity_threshold_adds_only_that_rule() {
        let mut below = calm_adult();
        below.electricity_usage = 399.0;
        let mut above = below.clone();
        above.electricity_usage = 401.0;

        let before = recommend(&below).recommendations;
        let after = recommend(&above).recommendations;

        assert_eq!(after.len(), before.len() + 1);
        for r in &before {
            assert!(after.contains(r));
        }
        let added: Vec<&Recommendation> = after.iter().filter(|r| !before.contains(r)).collect();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].priority, Priority::High);
        assert_eq!(added[0].action, "대기전력 차단하고 고효율 가전 쓰기");
    }

    #[test]
    fn test_calm_adult_gets_only_baseline_and_variants() {
        let report = recommend(&calm_adult());
        assert_eq!(report.counts.high, 0);
        assert_eq!(
            actions(&report, Priority::Medium),
            vec!["지역 기후 행동 캠페인 참여하기", "주 1회 채식 식단 실천하기"]
        );
        assert_eq!(
            actions(&report, Priority::Low),
            vec!["지역 숲 가꾸기 봉사 참여하기", "텀블러·장바구니 들고 다니기"]
        );
    }

    #[test]
    fn test_carbon_without_car() {
        // 2 modes * 20 + 200 * 0.5 + 0 * 30
        assert_eq!(carbon_estimate_kg(&calm_adult()), 140.0);

        let mut nobody = calm_adult();
        nobody.transport.clear();
        nobody.waste_score = 1;
        assert_eq!(carbon_estimate_kg(&nobody), 100.0 + 120.0);
    }

    #[test]
    fn test_car_rate_applies_to_every_mode() {
        let mut mixed = calm_adult();
        mixed.transport = [TransportMode::Car, TransportMode::Bicycle].into_iter().collect();
        assert_eq!(carbon_estimate_kg(&mixed), 100.0 + 100.0);
    }

    #[test]
    fn test_age_boundary() {
        let mut fifteen = calm_adult();
        fifteen.age = 15;
        let medium = actions(&recommend(&fifteen), Priority::Medium);
        assert!(medium.contains(&"학교 환경 동아리 참여하기".to_string()));
        fifteen.age = 16;
        let medium = actions(&recommend(&fifteen), Priority::Medium);
        assert!(medium.contains(&"지역 기후 행동 캠페인 참여하기".to_string()));
    }

    #[test]
    fn test_carbon_counts_each_mode_once() {
        let json = serde_json::json!({
            "age": 14,
            "region": "서울",
            "transport": ["자가용", "자가용"],
            "electricity_usage": 0,
            "waste_score": 5,
            "concern_score": 5,
            "future_anxiety_score": 5,
            "willingness_score": 5
        });
        let profile: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(carbon_estimate_kg(&profile), 50.0);
    }

    #[test]
    fn test_is_urban() {
        assert!(is_urban("서울"));
        assert!(is_urban(" 부산 "));
        assert!(!is_urban("제주"));
    }

    #[test]
    fn test_report_is_reproducible() {
        assert_eq!(recommend(&student()), recommend(&student()));
    }
}
