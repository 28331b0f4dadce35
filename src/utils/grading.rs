//! 成绩换算

use std::cmp::Ordering;

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 得分百分比，满分为 0 时记 0
pub fn percentage(obtained: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    obtained / max * 100.0
}

// (下限, 等级)，按下限从高到低
const GRADE_SCALE: [(f64, &str); 7] = [
    (90.0, "A+"),
    (80.0, "A"),
    (70.0, "B+"),
    (60.0, "B"),
    (50.0, "C"),
    (40.0, "D"),
    (33.0, "E"),
];

pub fn letter_grade(percentage: f64) -> &'static str {
    GRADE_SCALE
        .iter()
        .find(|(floor, _)| percentage >= *floor)
        .map(|(_, grade)| *grade)
        .unwrap_or("F")
}

/// 按两位小数比较分数，高分在前
pub fn score_desc(a: f64, b: f64) -> Ordering {
    round2(b).total_cmp(&round2(a))
}

/// 标准竞争排名（"1224"）
///
/// `scores` 须已按 [`score_desc`] 排好序；同分同名次，下一个分数的名次为前面的人数加一。
pub fn competition_ranks(scores: &[f64]) -> Vec<u32> {
    let mut ranks: Vec<u32> = Vec::with_capacity(scores.len());
    for (i, score) in scores.iter().enumerate() {
        let rank = match i.checked_sub(1) {
            Some(prev) if round2(scores[prev]) == round2(*score) => ranks[prev],
            _ => i as u32 + 1,
        };
        ranks.push(rank);
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(50.0), 50.0);
        assert_eq!(round2(12.344), 12.34);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(45.0, 50.0), 90.0);
        assert_eq!(percentage(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_letter_grade_boundaries() {
        assert_eq!(letter_grade(100.0), "A+");
        assert_eq!(letter_grade(90.0), "A+");
        assert_eq!(letter_grade(89.99), "A");
        assert_eq!(letter_grade(70.0), "B+");
        assert_eq!(letter_grade(60.0), "B");
        assert_eq!(letter_grade(50.0), "C");
        assert_eq!(letter_grade(40.0), "D");
        assert_eq!(letter_grade(33.0), "E");
        assert_eq!(letter_grade(32.99), "F");
        assert_eq!(letter_grade(0.0), "F");
    }

    #[test]
    fn test_competition_ranks() {
        assert_eq!(competition_ranks(&[95.0, 90.0, 90.0, 80.0]), vec![1, 2, 2, 4]);
        assert_eq!(competition_ranks(&[70.0, 70.0, 70.0]), vec![1, 1, 1]);
        assert!(competition_ranks(&[]).is_empty());
        // 两位小数后相同视为并列
        assert_eq!(competition_ranks(&[88.333, 88.331, 70.0]), vec![1, 1, 3]);
    }

    #[test]
    fn test_score_desc_sorts_high_first() {
        let mut scores = vec![55.0, 91.5, 72.25];
        scores.sort_by(|a, b| score_desc(*a, *b));
        assert_eq!(scores, vec![91.5, 72.25, 55.0]);
    }
}
