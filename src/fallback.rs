//! Embedded sample news, shown whenever a date's news file cannot be loaded.

use crate::models::{NewsBundle, NewsItem};
use once_cell::sync::Lazy;

/// (title, source, date, summary, url)
type Sample = (&'static str, &'static str, &'static str, &'static str, &'static str);

const CONSULTING: &[Sample] = &[
    (
        "マッキンゼー、生成AIを活用した経営コンサルティングサービスを本格展開",
        "日本経済新聞",
        "2026-01-27",
        "マッキンゼー・アンド・カンパニーは、生成AIを活用した新たな経営コンサルティングサービス「Lilli」の日本市場での本格展開を発表。企業のDX推進を加速させる。",
        "https://example.com/mckinsey-ai",
    ),
    (
        "BCG、サステナビリティ領域の専門チームを大幅増強",
        "東洋経済オンライン",
        "2026-01-26",
        "ボストン・コンサルティング・グループは、ESG・サステナビリティ分野の専門コンサルタントを2026年中に50%増員する計画を発表。脱炭素経営支援の需要増に対応。",
        "https://example.com/bcg-sustainability",
    ),
    (
        "デロイト トーマツ、M&Aアドバイザリー部門が過去最高の売上を記録",
        "週刊ダイヤモンド",
        "2026-01-25",
        "デロイト トーマツ ファイナンシャルアドバイザリーは、2025年度のM&Aアドバイザリー売上高が過去最高を更新したと発表。事業承継案件の増加が寄与。",
        "https://example.com/deloitte-ma",
    ),
    (
        "アクセンチュア、日本でのDX人材を5,000人規模に拡大へ",
        "ITmedia",
        "2026-01-24",
        "アクセンチュアは2027年までに日本国内のDX専門人材を5,000人規模に拡大する方針を明らかにした。クラウド移行とAI導入支援の需要増に対応。",
        "https://example.com/accenture-dx",
    ),
    (
        "PwC、スタートアップ向け成長支援プログラムを刷新",
        "Forbes Japan",
        "2026-01-23",
        "PwC Japanグループは、スタートアップ企業向けの成長支援プログラム「Scale-Up Academy」を刷新。IPO準備からグローバル展開まで一気通貫で支援。",
        "https://example.com/pwc-startup",
    ),
];

const AI: &[Sample] = &[
    (
        "OpenAI、GPT-5の開発状況を公開 - 推論能力が大幅向上",
        "TechCrunch Japan",
        "2026-01-27",
        "OpenAIは次期大規模言語モデル「GPT-5」の開発進捗を公開。複雑な推論タスクにおいて人間の専門家レベルの性能を達成したと発表。",
        "https://example.com/gpt5",
    ),
    (
        "Anthropic、Claude 4.5をリリース - 長文理解と多言語対応を強化",
        "WIRED Japan",
        "2026-01-26",
        "Anthropicは最新AIアシスタント「Claude 4.5」をリリース。20万トークンのコンテキスト長と100以上の言語サポートを実現し、ビジネス用途での採用が加速。",
        "https://example.com/claude-45",
    ),
    (
        "Google、Gemini 2.0を発表 - マルチモーダル性能で業界最高水準",
        "Impress Watch",
        "2026-01-25",
        "Googleは次世代AIモデル「Gemini 2.0」を発表。画像・動画・音声の統合理解において業界最高水準の性能を達成。Google Workspaceへの統合も強化。",
        "https://example.com/gemini-2",
    ),
    (
        "EU AI規制法が施行開始 - 生成AIに厳格な透明性要件",
        "日経クロステック",
        "2026-01-24",
        "EU AI法（EU AI Act）の主要規定が施行開始。生成AIシステムには学習データの開示義務やコンテンツのAI生成表示が義務化される。",
        "https://example.com/eu-ai-act",
    ),
    (
        "日本政府、AI戦略2026を策定 - 国産LLM開発に1,000億円投資",
        "NHKニュース",
        "2026-01-23",
        "政府は「AI戦略2026」を閣議決定。国産大規模言語モデルの開発に1,000億円を投資し、産学官連携による国際競争力強化を目指す。",
        "https://example.com/japan-ai-strategy",
    ),
];

static FALLBACK: Lazy<NewsBundle> = Lazy::new(|| NewsBundle {
    date: None,
    updated_at: None,
    consulting: Some(to_items(CONSULTING)),
    ai: Some(to_items(AI)),
});

fn to_items(samples: &[Sample]) -> Vec<NewsItem> {
    samples
        .iter()
        .map(|&(title, source, date, summary, url)| NewsItem {
            title: title.to_string(),
            source: source.to_string(),
            date: date.to_string(),
            summary: summary.to_string(),
            url: Some(url.to_string()),
        })
        .collect()
}

/// A fresh copy of the sample bundle.
pub fn fallback_bundle() -> NewsBundle {
    FALLBACK.clone()
}
