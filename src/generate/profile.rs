//! Mood profiles
//!
//! The cocktail and dish generators are the same algorithm parameterized by
//! configuration: persona prompt, output schema, fallback data, and whether
//! a dish illustration is wanted.

use once_cell::sync::Lazy;

use crate::generate::artifact::{GeneratedArtifact, NoteAnalysis};

/// Which flavor of generation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodProfile {
    /// Cocktail generation ("Mood Bar")
    Mixology,
    /// Comfort-food generation ("心境食堂")
    Dining,
}

const MIXOLOGY_PROMPT: &str = r#"Role: Expert Mixologist.
Task: Create a unique cocktail based on the user's mood.
User Mood: "{mood}"
REQUIREMENTS:
1. Output VALID JSON ONLY. No markdown.
2. Language: Simplified Chinese for ALL fields.
JSON SCHEMA:
{
  "name": "String (English Name)",
  "cnName": "String (Creative Chinese Name)",
  "liquidColor": "String (CSS linear-gradient e.g. 'linear-gradient(180deg, red 0%, black 100%)')",
  "base": "String (Base Spirit)",
  "mid": "String (Middle Note)",
  "top": "String (Garnish/Top Note)",
  "desc": "String (Poetic description)",
  "analysis": { "base": "String", "mid": "String", "top": "String" }
}"#;

const DINING_PROMPT: &str = r#"Role: A cute, heartwarming anime chef.
Task: Recommend a comforting dish based on user's mood.
User Mood: "{mood}"
REQUIREMENTS:
1. Output VALID JSON ONLY.
2. Language: Simplified Chinese for display fields. English for imagePrompt.
3. Style: Cute, healing, heartwarming.
JSON SCHEMA:
{
  "name": "String (English Name)",
  "cnName": "String (Cute Chinese Name)",
  "themeColor": "String (CSS linear-gradient, bright and appetizing)",
  "main": "String", "side": "String", "garnish": "String",
  "desc": "String (Cute, healing description)",
  "imagePrompt": "String (English prompt for image gen. Keywords: 'cute chibi food', 'kawaii', 'flat vector', 'simple', 'white background', 'isolated')",
  "analysis": { "main": "String", "side": "String", "garnish": "String" }
}"#;

impl MoodProfile {
    pub fn name(&self) -> &'static str {
        match self {
            MoodProfile::Mixology => "mixology",
            MoodProfile::Dining => "dining",
        }
    }

    /// Only the dining flavor fetches generated dish art
    pub fn wants_image(&self) -> bool {
        matches!(self, MoodProfile::Dining)
    }

    /// Build the single prompt sent to the model
    pub fn prompt(&self, mood: &str) -> String {
        let template = match self {
            MoodProfile::Mixology => MIXOLOGY_PROMPT,
            MoodProfile::Dining => DINING_PROMPT,
        };
        template.replace("{mood}", mood)
    }

    /// Pre-written offline records served when the live path is unavailable
    pub fn fallbacks(&self) -> &'static [GeneratedArtifact] {
        match self {
            MoodProfile::Mixology => FALLBACK_COCKTAILS.as_slice(),
            MoodProfile::Dining => FALLBACK_DISHES.as_slice(),
        }
    }
}

fn record(
    name: &str,
    cn_name: &str,
    color: &str,
    desc: &str,
    notes: [&str; 3],
    analysis: [&str; 3],
    image_prompt: Option<&str>,
) -> GeneratedArtifact {
    GeneratedArtifact {
        name: name.to_string(),
        cn_name: cn_name.to_string(),
        desc: desc.to_string(),
        base: notes[0].to_string(),
        mid: notes[1].to_string(),
        top: notes[2].to_string(),
        analysis: NoteAnalysis {
            base: analysis[0].to_string(),
            mid: analysis[1].to_string(),
            top: analysis[2].to_string(),
        },
        color: Some(color.to_string()),
        image_prompt: image_prompt.map(str::to_string),
        image_url: None,
    }
}

static FALLBACK_COCKTAILS: Lazy<Vec<GeneratedArtifact>> = Lazy::new(|| {
    vec![
        record(
            "Midnight Echo",
            "午夜回声",
            "linear-gradient(180deg, rgba(30, 41, 59, 0.9) 0%, rgba(71, 85, 105, 0.95) 100%)",
            "沉入海底的那句叹息，化作舌尖的冷冽。",
            ["金酒", "白桃", "薄荷"],
            [
                "金酒的冷冽，回应你内心的静默时刻。",
                "白桃的清甜，是记忆中模糊的温柔。",
                "薄荷带来的清凉，试图冲破此刻的压抑。",
            ],
            None,
        ),
        record(
            "Velvet Sunset",
            "天鹅绒日落",
            "linear-gradient(180deg, rgba(154, 52, 18, 0.9) 0%, rgba(255, 166, 158, 0.85) 100%)",
            "将笑意酿成晚霞，余温尚存。",
            ["朗姆", "玫瑰", "西柚"],
            [
                "温润的陈年朗姆，呼应你原本昂扬的情绪。",
                "玫瑰的馥郁，是对美好瞬间的留恋。",
                "西柚的微苦，是成熟后的清醒与克制。",
            ],
            None,
        ),
        record(
            "Emerald Dream",
            "翡翠梦境",
            "linear-gradient(180deg, rgba(6, 78, 59, 0.9) 0%, rgba(52, 211, 153, 0.8) 100%)",
            "迷失在雨后的森林，呼吸着潮湿的苔藓。",
            ["伏特加", "青柠", "罗勒"],
            [
                "纯净的伏特加，让一切归于原本的空白。",
                "青柠的酸涩，刺激着麻木的感官。",
                "罗勒的草本香气，带你逃离城市的喧嚣。",
            ],
            None,
        ),
    ]
});

static FALLBACK_DISHES: Lazy<Vec<GeneratedArtifact>> = Lazy::new(|| {
    vec![
        record(
            "Midnight Ramen",
            "猫咪暖暖拉面",
            "linear-gradient(135deg, #fbbf24 0%, #f59e0b 100%)",
            "像被一只毛茸茸的大猫抱住，呼噜呼噜地治愈你的疲惫。",
            ["豚骨汤", "溏心蛋", "鸣门卷"],
            [
                "浓郁的汤底，把心里的洞填得满满当当。",
                "流心的蛋黄，是生活里的小确幸。",
                "可爱的鱼板，提醒你保持童心。",
            ],
            Some(
                "cute ramen bowl with cat ears, soft boiled egg, naruto fish cake, steam, kawaii, \
                 chibi style, flat vector illustration, simple colors, white background, thick \
                 outlines, sticker style",
            ),
        ),
        record(
            "Cloudy Congee",
            "云朵绵绵粥",
            "linear-gradient(135deg, #e5e7eb 0%, #d1d5db 100%)",
            "把烦恼都熬化了，只剩下软乎乎的温柔。",
            ["香米", "干贝", "葱花"],
            [
                "米香扑鼻，带你回到小时候的午后。",
                "藏在粥里的鲜甜，是给你的惊喜。",
                "一点点翠绿，心情也跟着亮起来。",
            ],
            Some(
                "cute white rice porridge bowl, steam shaped like clouds, kawaii, chibi style, \
                 flat vector illustration, pastel colors, simple, white background, thick \
                 outlines, sticker style",
            ),
        ),
        record(
            "Happy Mapo Tofu",
            "元气麻婆豆腐",
            "linear-gradient(135deg, #f87171 0%, #ef4444 100%)",
            "热辣辣的一口下去，把所有的不开心都吓跑啦！",
            ["嫩豆腐", "肉酱", "花椒"],
            [
                "软嫩的豆腐，却有火热的内心。",
                "香喷喷的肉酱，让满足感爆棚。",
                "酥酥麻麻的感觉，唤醒你的能量。",
            ],
            Some(
                "cute spicy tofu dish, red cubes, happy face, kawaii, chibi style, flat vector \
                 illustration, vibrant colors, simple, white background, thick outlines, sticker \
                 style",
            ),
        ),
    ]
});
