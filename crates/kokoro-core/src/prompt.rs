//! Prompt template for the diary analysis call.
//!
//! The model receives every deterministic feature as labeled blocks and must
//! answer with JSON only: `deepMessage`, `innerMessage`, `actionAdvice`. The
//! wording here is swappable product copy — the structured `Reading` is the
//! contract, not this string.

use chrono::{DateTime, FixedOffset, Timelike};

use crate::reading::{EntryKind, JournalEntry, Reading, UserProfile};

/// Response fields the model is required to emit.
pub const REQUIRED_FIELDS: [&str; 3] = ["deepMessage", "innerMessage", "actionAdvice"];

/// Builds the single user-turn prompt from the deterministic reading and the
/// journal entry. `now` is the same injected instant the reading used.
pub fn build_analysis_prompt(
    profile: &UserProfile,
    entry: &JournalEntry,
    reading: &Reading,
    now: DateTime<FixedOffset>,
) -> String {
    let hour_now = now.hour();
    let event_label = match entry.kind {
        EntryKind::Past => "今日あったこと",
        EntryKind::Future => "今日の予定",
    };
    let closing_label = match entry.kind {
        EntryKind::Past => "出来事から学べること",
        EntryKind::Future => "予定に向けての心構え",
    };

    let scores = &reading.theme_scores;
    let hints = &reading.today_hints;

    format!(
        r#"あなたは「占い師」ではなく「スピリチュアル×心理のコーチ」です。
当てることよりも、ユーザーが"行動に移せる内省"を提供してください。

【四柱推命（生年月日から算出）】
年柱: {year}
月柱: {month}
日柱: {day}
時柱: {hour}   ※{note}
生肖: {zodiac}
性別（任意）: {gender}

【大運（十年単位の流れ）】
{taiun_age}歳代: {taiun_pillar}（{taiun_desc}）

【バイオリズム】
身体: {p}%
感情: {e}%
知性: {i}%

【今日のテーマスコア（0-100）】
恋愛: {love} / 金運: {money} / 仕事: {work} / 健康: {health}

【今日のヒント】
色: {color} / 数字: {number} / 方位: {direction}
距離感: {distance}

【現在時刻】
{hour_now}時

【ユーザーのアウトプット】
気分: {emoji} {mood}
{event_label}: {event}
直感: {intuition}

【指示】
1. 時間帯（朝・昼・夜）に応じた"ひとこと導入"
2. バイオリズム×四柱推命×アウトプットから見える「今日の心理傾向」
   - 強み（活かし方）
   - 反応パターン（注意点）
3. {closing_label}
4. 実行可能なアクションを3つ（具体的）

【出力】
必ず JSONのみ。前後の説明文、装飾、``` は禁止。
{{
  "deepMessage": "300文字程度の深いメッセージ",
  "innerMessage": "150文字程度の直感についての洞察",
  "actionAdvice": "具体的なアクション3つ（文章でも箇条書きでもOK）"
}}"#,
        year = reading.birth.year,
        month = reading.birth.month,
        day = reading.birth.day,
        hour = reading.birth.hour.as_deref().unwrap_or("不明"),
        note = reading.note,
        zodiac = reading.birth.zodiac.as_deref().unwrap_or("不明"),
        gender = profile.gender.as_deref().unwrap_or("未入力"),
        taiun_age = reading.taiun.age,
        taiun_pillar = reading.taiun.pillar,
        taiun_desc = reading.taiun.description,
        p = reading.biorhythm.p,
        e = reading.biorhythm.e,
        i = reading.biorhythm.i,
        love = scores.love,
        money = scores.money,
        work = scores.work,
        health = scores.health,
        color = hints.color.name,
        number = hints.number.value,
        direction = hints.direction.label,
        distance = hints.distance.phrase,
        hour_now = hour_now,
        emoji = entry.emoji,
        mood = entry.mood.as_deref().unwrap_or(""),
        event_label = event_label,
        event = entry.event,
        intuition = entry.intuition.as_deref().unwrap_or("なし"),
        closing_label = closing_label,
    )
}

/// Builds the prompt for entry placeholder suggestions. `time_of_day` is the
/// UI's 朝/昼/夜 token; anything else reads as evening.
pub fn build_placeholder_prompt(time_of_day: &str) -> String {
    let time_context = match time_of_day {
        "朝" => "朝の始まり",
        "昼" => "日中の活動時間",
        _ => "夜のリラックスタイム",
    };

    format!(
        r#"あなたはスピリチュアル日記アプリのプレースホルダーテキスト生成AIです。
ユーザーが日記を書く際の「例文」として、自然で親しみやすい文章を生成してください。

【時間帯】
{time_context}（{time_of_day}）

【指示】
以下の3つのフィールドの例文を生成してください。毎回違う内容にすること。
1. mood: 気分を表す短い一言（10-15文字程度、具体的な感情表現）
2. event: 今日あった出来事の例文（30-45文字程度、リアルで共感できる日常。2文、3文程度で）
3. intuition: 直感的な一言の例文（15-25文字程度、スピリチュアルで前向き）

【注意点】
- 自然で親しみやすい表現
- ポジティブすぎず、リアルな日常感
- 時間帯に合った内容
- 押し付けがましくない、さりげない例文
- 平凡すぎず、年齢・性別にあった内容

【出力】
必ず JSONのみ。前後の説明文、装飾、``` は禁止。
{{
  "mood": "例文",
  "event": "例文",
  "intuition": "例文"
}}"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::SexagenaryCalendar;
    use crate::hints::FirstPicker;
    use crate::reading::analyze;
    use chrono::TimeZone;

    #[test]
    fn test_prompt_carries_all_blocks() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).single().unwrap();
        let profile = UserProfile {
            birth_date: "1990-05-15".to_string(),
            birth_time: None,
            gender: None,
            nickname: None,
        };
        let entry = JournalEntry {
            emoji: "😊".to_string(),
            mood: Some("すっきり".to_string()),
            kind: EntryKind::Future,
            event: "大事な打ち合わせ".to_string(),
            intuition: None,
        };
        let reading = analyze(&profile, &entry, now, &SexagenaryCalendar, &FirstPicker).unwrap();
        let prompt = build_analysis_prompt(&profile, &entry, &reading, now);

        assert!(prompt.contains(&reading.birth.year));
        assert!(prompt.contains("時柱: 不明"));
        assert!(prompt.contains("12:00"));
        assert!(prompt.contains("今日の予定: 大事な打ち合わせ"));
        assert!(prompt.contains("9時"));
        for field in REQUIRED_FIELDS {
            assert!(prompt.contains(field));
        }
    }

    #[test]
    fn test_placeholder_prompt_maps_time_of_day() {
        assert!(build_placeholder_prompt("朝").contains("朝の始まり"));
        assert!(build_placeholder_prompt("昼").contains("日中の活動時間"));
        assert!(build_placeholder_prompt("夜").contains("夜のリラックスタイム"));
        // Missing or unknown tokens read as evening.
        assert!(build_placeholder_prompt("").contains("夜のリラックスタイム"));

        let prompt = build_placeholder_prompt("朝");
        for field in ["mood", "event", "intuition"] {
            assert!(prompt.contains(field));
        }
    }
}
