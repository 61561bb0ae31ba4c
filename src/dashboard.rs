// src/dashboard.rs
//! Dashboard KPIs: totals over every record, month-over-month trends and
//! a short feed of the latest activity across all five record kinds.
//!
//! `aggregate` is a pure function of the fetched rows and a clock value;
//! the handler only gathers the rows.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use crate::AppState;
use crate::error::ApiResult;
use crate::handlers::ApiResponse;
use crate::models::{ChuiraRecord, DhaanRecord, ExpenseRecord, SalaryRecord, SalesRecord};
use crate::repositories::{
    ChuiraRepository, DhaanRepository, ExpenseRepository, RecordRepository, SalaryRepository,
    SalesRepository,
};

/// Rows per table considered for the activity feed.
const RECENT_PER_TABLE: i64 = 10;
/// Entries kept in the merged activity feed.
const RECENT_ACTIVITY_LIMIT: usize = 5;

// ==================== RESPONSE TYPES ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_dhaan_collected: f64,
    pub total_chuira_produced: f64,
    pub total_expenses: f64,
    pub total_sales: f64,
    pub actual_profit: f64,
    pub total_salary_expenses: f64,
    pub total_extra_expenses: f64,
    pub recent_activities: Vec<Activity>,
    pub trends: Trends,
}

#[derive(Debug, Serialize)]
pub struct Trends {
    pub dhaan: Trend,
    pub chuira: Trend,
    pub expenses: Trend,
    pub sales: Trend,
    pub profit: Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    /// Absolute percentage change
    pub value: i64,
    pub is_positive: bool,
}

impl Trend {
    fn higher_is_better(pct: i64) -> Self {
        Self { value: pct.saturating_abs(), is_positive: pct >= 0 }
    }

    fn lower_is_better(pct: i64) -> Self {
        Self { value: pct.saturating_abs(), is_positive: pct <= 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Success,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub action: String,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    /// Milliseconds since the epoch of the row's creation
    pub timestamp: i64,
}

/// Rows of every record kind, as read for one dashboard request.
#[derive(Debug, Default)]
pub struct Collections {
    pub dhaan: Vec<DhaanRecord>,
    pub chuira: Vec<ChuiraRecord>,
    pub salary: Vec<SalaryRecord>,
    pub expense: Vec<ExpenseRecord>,
    pub sales: Vec<SalesRecord>,
}

// ==================== AGGREGATION ====================

/// Calendar month (UTC) as (year, month).
type Month = (i32, u32);

fn month_of(date: &DateTime<Utc>) -> Month {
    (date.year(), date.month())
}

fn previous_month((year, month): Month) -> Month {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// Sum of `value` over rows whose business date falls in `month`.
fn sum_in_month<T>(
    rows: &[T],
    month: Month,
    date: impl Fn(&T) -> &DateTime<Utc>,
    value: impl Fn(&T) -> f64,
) -> f64 {
    rows.iter()
        .filter(|row| month_of(date(*row)) == month)
        .map(value)
        .sum()
}

#[derive(Debug, Clone, Copy, Default)]
struct MonthFigures {
    dhaan: f64,
    chuira: f64,
    expenses: f64,
    sales: f64,
}

impl MonthFigures {
    fn for_month(all: &Collections, month: Month) -> Self {
        let extra = sum_in_month(&all.expense, month, |r| &r.date, |r| r.amount);
        let salary = sum_in_month(&all.salary, month, |r| &r.paid_date, |r| r.salary_amount);

        Self {
            dhaan: sum_in_month(&all.dhaan, month, |r| &r.date, |r| r.quantity),
            chuira: sum_in_month(&all.chuira, month, |r| &r.date, |r| r.produced),
            expenses: extra + salary,
            sales: sum_in_month(&all.sales, month, |r| &r.date, |r| r.total_price),
        }
    }

    fn profit(&self) -> f64 {
        self.sales - self.expenses
    }
}

/// Cap on a reported trend, reached only against a near-zero baseline.
pub const MAX_TREND_PERCENT: i64 = 1_000_000_000_000;

/// Whole-number percentage change from `previous` to `current`.
///
/// A zero baseline reports 100 when anything happened this month and 0
/// otherwise. Halves round toward positive infinity. The result is clamped
/// to `±MAX_TREND_PERCENT`.
pub fn calculate_trend(current: f64, previous: f64) -> i64 {
    if previous == 0.0 {
        return if current > 0.0 { 100 } else { 0 };
    }
    let pct = (current - previous) / previous * 100.0;
    if pct.is_nan() {
        return 0;
    }
    let limit = MAX_TREND_PERCENT as f64;
    (pct + 0.5).floor().clamp(-limit, limit) as i64
}

/// "N seconds/minutes/hours/days/months/years ago", months of 30 days and
/// years of 365.
pub fn time_ago(then: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let secs = (*now - *then).num_seconds().max(0);

    match secs {
        s if s < 60 => format!("{} seconds ago", s),
        s if s < 3_600 => format!("{} minutes ago", s / 60),
        s if s < 86_400 => format!("{} hours ago", s / 3_600),
        s if s < 2_592_000 => format!("{} days ago", s / 86_400),
        s if s < 31_536_000 => format!("{} months ago", s / 2_592_000),
        s => format!("{} years ago", s / 31_536_000),
    }
}

/// Amount with thousands separators and at most three fraction digits:
/// `1234567.5` → `1,234,567.5`.
pub fn format_npr(amount: f64) -> String {
    let magnitude = amount.abs();
    let mut integral = magnitude.trunc();
    let mut frac = ((magnitude - integral) * 1000.0).round() as u64;
    if frac == 1000 {
        integral += 1.0;
        frac = 0;
    }
    // f64 prints every digit of its integral part, so no integer cast is needed
    let whole = format!("{:.0}", integral);

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && (integral > 0.0 || frac > 0) { "-" } else { "" };
    if frac == 0 {
        format!("{}{}", sign, grouped)
    } else {
        let digits = format!("{:03}", frac);
        format!("{}{}.{}", sign, grouped, digits.trim_end_matches('0'))
    }
}

fn activity(
    action: String,
    kind: ActivityType,
    created_at: &DateTime<Utc>,
    now: &DateTime<Utc>,
) -> Activity {
    Activity {
        action,
        time: time_ago(created_at, now),
        kind,
        timestamp: created_at.timestamp_millis(),
    }
}

fn recent_activities(recent: &Collections, now: &DateTime<Utc>) -> Vec<Activity> {
    let mut activities = Vec::new();

    for r in &recent.dhaan {
        activities.push(activity(
            format!("Dhaan collection from {} ({} kg)", r.farmer, r.quantity),
            ActivityType::Success,
            &r.created_at,
            now,
        ));
    }
    for r in &recent.chuira {
        activities.push(activity(
            format!("Chuira production batch {} ({} kg)", r.batch_id, r.produced),
            ActivityType::Warning,
            &r.created_at,
            now,
        ));
    }
    for r in &recent.salary {
        activities.push(activity(
            format!("Salary paid to {} (NPR {})", r.employee_name, format_npr(r.salary_amount)),
            ActivityType::Info,
            &r.created_at,
            now,
        ));
    }
    for r in &recent.expense {
        activities.push(activity(
            format!("Expense added: {} (NPR {})", r.category, format_npr(r.amount)),
            ActivityType::Info,
            &r.created_at,
            now,
        ));
    }
    for r in &recent.sales {
        activities.push(activity(
            format!("Sale to {} (NPR {})", r.customer_name, format_npr(r.total_price)),
            ActivityType::Success,
            &r.created_at,
            now,
        ));
    }

    activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    activities.truncate(RECENT_ACTIVITY_LIMIT);
    activities
}

/// Builds the dashboard from every row (`all`) and the newest rows of each
/// table (`recent`) as of `now`.
pub fn aggregate(all: &Collections, recent: &Collections, now: DateTime<Utc>) -> DashboardData {
    let total_dhaan_collected: f64 = all.dhaan.iter().map(|r| r.quantity).sum();
    let total_chuira_produced: f64 = all.chuira.iter().map(|r| r.produced).sum();
    let total_salary_expenses: f64 = all.salary.iter().map(|r| r.salary_amount).sum();
    let total_extra_expenses: f64 = all.expense.iter().map(|r| r.amount).sum();
    let total_sales: f64 = all.sales.iter().map(|r| r.total_price).sum();
    let total_expenses = total_salary_expenses + total_extra_expenses;

    let this_month = month_of(&now);
    let current = MonthFigures::for_month(all, this_month);
    let previous = MonthFigures::for_month(all, previous_month(this_month));

    let trends = Trends {
        dhaan: Trend::higher_is_better(calculate_trend(current.dhaan, previous.dhaan)),
        chuira: Trend::higher_is_better(calculate_trend(current.chuira, previous.chuira)),
        expenses: Trend::lower_is_better(calculate_trend(current.expenses, previous.expenses)),
        sales: Trend::higher_is_better(calculate_trend(current.sales, previous.sales)),
        profit: Trend::higher_is_better(calculate_trend(current.profit(), previous.profit())),
    };

    DashboardData {
        total_dhaan_collected,
        total_chuira_produced,
        total_expenses,
        total_sales,
        actual_profit: total_sales - total_expenses,
        total_salary_expenses,
        total_extra_expenses,
        recent_activities: recent_activities(recent, &now),
        trends,
    }
}

// ==================== HANDLER ====================

#[tracing::instrument(skip(app_state))]
pub async fn get_dashboard(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let pool = &app_state.db_pool;
    let (dhaan_repo, chuira_repo, salary_repo, expense_repo, sales_repo) = (
        DhaanRepository,
        ChuiraRepository,
        SalaryRepository,
        ExpenseRepository,
        SalesRepository,
    );

    let (dhaan, chuira, salary, expense, sales) = futures::try_join!(
        dhaan_repo.list(pool, None),
        chuira_repo.list(pool, None),
        salary_repo.list(pool, None),
        expense_repo.list(pool, None),
        sales_repo.list(pool, None),
    )?;
    let all = Collections { dhaan, chuira, salary, expense, sales };

    let (dhaan, chuira, salary, expense, sales) = futures::try_join!(
        dhaan_repo.recent(pool, RECENT_PER_TABLE),
        chuira_repo.recent(pool, RECENT_PER_TABLE),
        salary_repo.recent(pool, RECENT_PER_TABLE),
        expense_repo.recent(pool, RECENT_PER_TABLE),
        sales_repo.recent(pool, RECENT_PER_TABLE),
    )?;
    let recent = Collections { dhaan, chuira, salary, expense, sales };

    let data = aggregate(&all, &recent, Utc::now());
    tracing::debug!(
        activities = data.recent_activities.len(),
        profit = data.actual_profit,
        "dashboard aggregated"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn dhaan(quantity: f64, date: DateTime<Utc>, created_at: DateTime<Utc>) -> DhaanRecord {
        DhaanRecord {
            id: format!("d-{}", quantity),
            quantity,
            farmer: "Ram".into(),
            location: "Jhapa".into(),
            date,
            created_at,
            updated_at: created_at,
        }
    }

    fn salary(amount: f64, paid_date: DateTime<Utc>, created_at: DateTime<Utc>) -> SalaryRecord {
        SalaryRecord {
            id: format!("s-{}", amount),
            employee_name: "Gita".into(),
            salary_amount: amount,
            paid_date,
            created_at,
            updated_at: created_at,
        }
    }

    fn expense(amount: f64, date: DateTime<Utc>, created_at: DateTime<Utc>) -> ExpenseRecord {
        ExpenseRecord {
            id: format!("e-{}", amount),
            date,
            category: "Fuel".into(),
            description: String::new(),
            amount,
            status: "Pending".into(),
            created_at,
            updated_at: created_at,
        }
    }

    fn sale(total_price: f64, date: DateTime<Utc>, created_at: DateTime<Utc>) -> SalesRecord {
        SalesRecord {
            id: format!("o-{}", total_price),
            order_id: 1,
            date,
            quantity: 10.0,
            price_per_kg: 50.0,
            total_price,
            customer_name: "Hamro Mill".into(),
            status: "Pending".into(),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_calculate_trend() {
        assert_eq!(calculate_trend(50.0, 0.0), 100);
        assert_eq!(calculate_trend(0.0, 0.0), 0);
        assert_eq!(calculate_trend(150.0, 100.0), 50);
        assert_eq!(calculate_trend(50.0, 100.0), -50);
        assert_eq!(calculate_trend(1.0, 3.0), -67);
    }

    #[test]
    fn test_calculate_trend_against_tiny_baseline_is_clamped() {
        assert_eq!(calculate_trend(-1e11, 1e-6), -MAX_TREND_PERCENT);
        assert_eq!(calculate_trend(1e11, 1e-6), MAX_TREND_PERCENT);
        assert_eq!(calculate_trend(f64::INFINITY, 1.0), MAX_TREND_PERCENT);
        assert_eq!(Trend::higher_is_better(i64::MIN).value, i64::MAX);
    }

    #[test]
    fn test_profit_trend_from_near_zero_month() {
        let now = at(2024, 5, 10);
        let all = Collections {
            sales: vec![sale(0.000001, at(2024, 4, 20), now)],
            expense: vec![expense(1e11, at(2024, 5, 2), now)],
            ..Default::default()
        };

        let data = aggregate(&all, &Collections::default(), now);
        assert_eq!(data.trends.profit, Trend { value: MAX_TREND_PERCENT, is_positive: false });
        assert_eq!(data.trends.expenses, Trend { value: 100, is_positive: false });
    }

    #[test]
    fn test_time_ago() {
        let now = at(2024, 5, 10);
        assert_eq!(time_ago(&(now - Duration::seconds(5)), &now), "5 seconds ago");
        assert_eq!(time_ago(&(now - Duration::minutes(3)), &now), "3 minutes ago");
        assert_eq!(time_ago(&(now - Duration::hours(2)), &now), "2 hours ago");
        assert_eq!(time_ago(&(now - Duration::days(4)), &now), "4 days ago");
        assert_eq!(time_ago(&(now - Duration::days(65)), &now), "2 months ago");
        assert_eq!(time_ago(&(now - Duration::days(800)), &now), "2 years ago");
        assert_eq!(time_ago(&(now + Duration::seconds(30)), &now), "0 seconds ago");
    }

    #[test]
    fn test_format_npr() {
        assert_eq!(format_npr(0.0), "0");
        assert_eq!(format_npr(999.0), "999");
        assert_eq!(format_npr(15000.0), "15,000");
        assert_eq!(format_npr(1234567.5), "1,234,567.5");
        assert_eq!(format_npr(12.3456), "12.346");
        assert_eq!(format_npr(-2500.25), "-2,500.25");
        assert_eq!(format_npr(-0.0001), "0");
        assert_eq!(format_npr(1.9996), "2");
    }

    #[test]
    fn test_format_npr_beyond_integer_range() {
        assert_eq!(format_npr(1e20), "100,000,000,000,000,000,000");
        assert_eq!(format_npr(-2e19), "-20,000,000,000,000,000,000");
    }

    #[test]
    fn test_profit_identity() {
        let now = at(2024, 5, 10);
        let all = Collections {
            salary: vec![salary(15000.0, at(2024, 4, 30), now), salary(5000.0, at(2024, 5, 1), now)],
            expense: vec![expense(2500.5, at(2024, 5, 3), now)],
            sales: vec![sale(40000.0, at(2024, 5, 5), now), sale(1200.0, at(2023, 1, 5), now)],
            ..Default::default()
        };

        let data = aggregate(&all, &Collections::default(), now);
        assert_eq!(data.total_salary_expenses, 20000.0);
        assert_eq!(data.total_extra_expenses, 2500.5);
        assert_eq!(data.total_expenses, 22500.5);
        assert_eq!(data.total_sales, 41200.0);
        assert_eq!(
            data.actual_profit,
            data.total_sales - (data.total_salary_expenses + data.total_extra_expenses)
        );
    }

    #[test]
    fn test_trends_compare_calendar_months() {
        let now = at(2024, 1, 15);
        let all = Collections {
            // December of the previous year is the baseline in January
            dhaan: vec![dhaan(100.0, at(2023, 12, 20), now), dhaan(150.0, at(2024, 1, 2), now)],
            expense: vec![expense(200.0, at(2023, 12, 10), now), expense(100.0, at(2024, 1, 3), now)],
            sales: vec![sale(500.0, at(2024, 1, 4), now)],
            ..Default::default()
        };

        let data = aggregate(&all, &Collections::default(), now);
        assert_eq!(data.trends.dhaan, Trend { value: 50, is_positive: true });
        // Spending halved: a negative change is reported as good
        assert_eq!(data.trends.expenses, Trend { value: 50, is_positive: true });
        assert_eq!(data.trends.sales, Trend { value: 100, is_positive: true });
        assert_eq!(data.trends.chuira, Trend { value: 0, is_positive: true });
        // -200 → 400
        assert_eq!(data.trends.profit, Trend { value: 300, is_positive: false });
    }

    #[test]
    fn test_rising_expenses_are_not_positive() {
        let now = at(2024, 5, 10);
        let all = Collections {
            salary: vec![salary(100.0, at(2024, 4, 1), now), salary(300.0, at(2024, 5, 1), now)],
            ..Default::default()
        };

        let data = aggregate(&all, &Collections::default(), now);
        assert_eq!(data.trends.expenses, Trend { value: 200, is_positive: false });
    }

    #[test]
    fn test_recent_activities_are_merged_newest_first() {
        let now = at(2024, 5, 10);
        let minutes_ago = |m: i64| now - Duration::minutes(m);

        let recent = Collections {
            dhaan: vec![dhaan(120.0, now, minutes_ago(1)), dhaan(80.0, now, minutes_ago(30))],
            salary: vec![salary(15000.0, now, minutes_ago(5))],
            expense: vec![expense(2500.0, now, minutes_ago(2))],
            sales: vec![sale(45000.0, now, minutes_ago(3)), sale(100.0, now, minutes_ago(40))],
            ..Default::default()
        };

        let data = aggregate(&Collections::default(), &recent, now);
        let actions: Vec<&str> = data.recent_activities.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(
            actions,
            vec![
                "Dhaan collection from Ram (120 kg)",
                "Expense added: Fuel (NPR 2,500)",
                "Sale to Hamro Mill (NPR 45,000)",
                "Salary paid to Gita (NPR 15,000)",
                "Dhaan collection from Ram (80 kg)",
            ]
        );
        assert_eq!(data.recent_activities[0].kind, ActivityType::Success);
        assert_eq!(data.recent_activities[1].kind, ActivityType::Info);
        assert_eq!(data.recent_activities[0].time, "1 minutes ago");
        assert_eq!(data.recent_activities[0].timestamp, minutes_ago(1).timestamp_millis());
    }

    #[test]
    fn test_dashboard_serializes_camel_case() {
        let data = aggregate(&Collections::default(), &Collections::default(), at(2024, 5, 10));
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["actualProfit"], 0.0);
        assert_eq!(json["trends"]["profit"]["isPositive"], true);
        assert!(json["recentActivities"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_dashboard_endpoint() {
        use actix_web::{http::StatusCode, test};
        use serde_json::json;
        use crate::handlers::test_support::{read_json, test_app};

        let (app, _state) = test_app!();

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let req = test::TestRequest::post()
            .uri("/api/sales")
            .set_json(json!({
                "orderId": 1,
                "date": today,
                "quantity": 10,
                "pricePerKg": 50,
                "totalPrice": 450,
                "customerName": "Hamro Mill"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/employee-salary")
            .set_json(json!({ "employeeName": "Gita", "salaryAmount": 200, "paidDate": today }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/api/dashboard").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_json(resp).await;
        let data = &body["data"];
        assert_eq!(data["totalSales"], 450.0);
        assert_eq!(data["totalExpenses"], 200.0);
        assert_eq!(data["actualProfit"], 250.0);
        assert_eq!(data["trends"]["sales"]["value"], 100);
        assert_eq!(data["recentActivities"].as_array().unwrap().len(), 2);
        assert_eq!(data["recentActivities"][0]["type"], "info");
    }
}
