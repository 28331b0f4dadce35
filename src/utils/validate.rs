use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static SCHOOL_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{2,16}$").expect("Invalid school code regex"));

static ADMISSION_NO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9/_-]{1,32}$").expect("Invalid admission number regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 -]{5,18}[0-9]$").expect("Invalid phone regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").expect("Invalid color regex"));

pub fn validate_school_code(code: &str) -> Result<(), &'static str> {
    // 学校代码：2 到 16 位字母、数字、下划线或连字符
    if !SCHOOL_CODE_RE.is_match(code) {
        return Err("School code must be 2-16 letters, digits, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_admission_no(admission_no: &str) -> Result<(), &'static str> {
    if !ADMISSION_NO_RE.is_match(admission_no) {
        return Err("Admission number must be 1-32 letters, digits, '/', '_' or '-'");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone) {
        return Err("Phone number format is invalid");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_color(color: &str) -> Result<(), &'static str> {
    if !COLOR_RE.is_match(color) {
        return Err("Color must be a hex value such as #1E90FF");
    }
    Ok(())
}

/// 校验必填文本：去除首尾空白后非空且不超过最大长度
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Err(format!("{field} must be at most {max_len} characters"));
    }
    Ok(())
}

/// 校验日期区间，`strict` 为 true 时要求结束日期严格晚于开始日期
pub fn validate_date_range(start: NaiveDate, end: NaiveDate, strict: bool) -> Result<(), String> {
    if (strict && end <= start) || end < start {
        return Err(format!(
            "End date {end} must be {} start date {start}",
            if strict { "after" } else { "on or after" }
        ));
    }
    Ok(())
}

/// 校验区间 `[start, end]` 是否落在外层区间内
pub fn validate_within(
    start: NaiveDate,
    end: NaiveDate,
    outer_start: NaiveDate,
    outer_end: NaiveDate,
) -> Result<(), String> {
    if start < outer_start || end > outer_end {
        return Err(format!(
            "Dates {start}..{end} must lie within {outer_start}..{outer_end}"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_school_code() {
        assert!(validate_school_code("SPS-01").is_ok());
        assert!(validate_school_code("a").is_err());
        assert!(validate_school_code("has space").is_err());
        assert!(validate_school_code("ABCDEFGHIJKLMNOPQ").is_err());
    }

    #[test]
    fn test_admission_no() {
        assert!(validate_admission_no("2025/0042").is_ok());
        assert!(validate_admission_no("").is_err());
        assert!(validate_admission_no("A 1").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("+977 98-1234-5678").is_ok());
        assert!(validate_phone("0123456").is_ok());
        assert!(validate_phone("12").is_err());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("office@school.edu").is_ok());
        assert!(validate_email("office@school").is_err());
    }

    #[test]
    fn test_color() {
        assert!(validate_color("#fff").is_ok());
        assert!(validate_color("#1E90FF").is_ok());
        assert!(validate_color("red").is_err());
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Math", "name", 10).is_ok());
        assert!(validate_required_text("   ", "name", 10).is_err());
        assert!(validate_required_text("abcdefghijk", "name", 10).is_err());
    }

    #[test]
    fn test_date_range() {
        assert!(validate_date_range(d(2025, 1, 1), d(2025, 1, 1), false).is_ok());
        assert!(validate_date_range(d(2025, 1, 1), d(2025, 1, 1), true).is_err());
        assert!(validate_date_range(d(2025, 1, 2), d(2025, 1, 1), false).is_err());
    }

    #[test]
    fn test_within() {
        let (ys, ye) = (d(2025, 4, 1), d(2026, 3, 31));
        assert!(validate_within(d(2025, 4, 1), d(2025, 9, 30), ys, ye).is_ok());
        assert!(validate_within(d(2025, 3, 1), d(2025, 9, 30), ys, ye).is_err());
    }
}
