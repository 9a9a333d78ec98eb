//! Advisory text shown to the person who filled in the survey

/// Japanese display labels for the columns named in advice
pub const FEATURE_LABELS: &[(&str, &str)] = &[
    ("GenHlth", "自覚的健康状態"),
    ("HighBP", "高血圧の有無"),
    ("Age", "年齢区分"),
    ("BMI", "体格指数（BMI）"),
    ("HighChol", "高コレステロールの有無"),
];

/// Risk factors listed in the high-risk paragraph, in display order
pub const RISK_FACTORS: &[(&str, &str)] = &[
    ("GenHlth", "自覚的健康状態が良くない可能性（1=最高、5=最低）"),
    ("HighBP", "高血圧がある場合はリスク上昇"),
    ("Age", "年齢が高くなるほどリスク上昇"),
    ("BMI", "BMI（体格指数）が高い場合はリスク上昇（25以上で要注意）"),
    ("HighChol", "高コレステロールがある場合はリスク上昇"),
];

pub const HIGH_RISK_HEADLINE: &str = "糖尿病予備軍または糖尿病のリスクが高い傾向が見られました。";
pub const HIGH_RISK_LEAD: &str = "特に以下の要素がリスクに関与している可能性があります：";
pub const HIGH_RISK_CLOSING: &str =
    "➡ 生活習慣（運動、食事、体重管理）、血圧・コレステロールの管理に取り組み、必要に応じて専門医にご相談ください。";

pub const LOW_RISK: &str = "現在のところ糖尿病リスクは高くないと推測されますが、引き続き健康管理に努めましょう。";

// === Attribution rules ===

pub const WEIGHT_MANAGEMENT: &str =
    "BMIが25を超えています。食事の見直しと適度な運動で体重管理に取り組みましょう。";
pub const SMOKING_CESSATION: &str = "喫煙は糖尿病リスクを高めます。禁煙を検討しましょう。";
pub const EXERCISE: &str =
    "運動習慣が見られません。ウォーキングなど1日30分程度の身体活動を取り入れましょう。";
pub const HEALTH_HABITS: &str =
    "自覚的健康状態がリスクに影響しています。睡眠・食事・運動などの生活習慣を見直しましょう。";

/// Display label for a column, falling back to the column name
pub fn feature_label(name: &str) -> &str {
    FEATURE_LABELS
        .iter()
        .find(|(feature, _)| *feature == name)
        .map(|(_, label)| *label)
        .unwrap_or(name)
}
