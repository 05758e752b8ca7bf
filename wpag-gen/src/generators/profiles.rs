//! Per-technology article profiles
//!
//! A profile fixes everything that differs between technologies: the
//! WordPress category, default topics and tags, the prompt pair and the
//! completion token budget.

use crate::types::Technology;

/// Static description of how articles for one technology are produced
#[derive(Debug)]
pub struct TechnologyProfile {
    pub technology: Technology,
    pub display_name: &'static str,
    pub category_id: u64,
    pub default_topics: &'static [&'static str],
    pub default_tags: &'static [&'static str],
    /// Fence language used in the prompt's code samples
    pub code_language: &'static str,
    pub system_prompt: &'static str,
    /// Contains a `{topic}` placeholder
    pub user_prompt_template: &'static str,
    /// `None` uses the completion client's configured budget
    pub max_tokens: Option<u32>,
    /// Take the post title from the generated text instead of the topic
    pub title_from_body: bool,
}

impl TechnologyProfile {
    pub fn user_prompt(&self, topic: &str) -> String {
        self.user_prompt_template.replace("{topic}", topic.trim())
    }
}

/// WordPress category id for a technology
pub fn category_id(technology: Technology) -> u64 {
    match technology {
        Technology::WordPress => 2,
        Technology::JavaScript => 6,
        Technology::Python => 7,
        Technology::React => 8,
        Technology::Vue => 9,
        Technology::Sql => 34,
    }
}

/// Profile for a technology, if articles for it can be generated
pub fn profile_for(technology: Technology) -> Option<&'static TechnologyProfile> {
    match technology {
        Technology::WordPress => Some(&WORDPRESS),
        Technology::JavaScript => Some(&JAVASCRIPT),
        Technology::Python => Some(&PYTHON),
        Technology::React => Some(&REACT),
        Technology::Vue => Some(&VUE),
        Technology::Sql => None,
    }
}

static WORDPRESS: TechnologyProfile = TechnologyProfile {
    technology: Technology::WordPress,
    display_name: "WordPress",
    category_id: 2,
    default_topics: &[
        "WordPressでカスタム投稿タイプを作成する方法",
        "WordPressフックの使い方とベストプラクティス",
        "WordPressのREST APIを活用した開発手法",
        "WordPressプラグイン開発の基礎知識",
        "WordPressテーマ開発で知っておくべきポイント",
    ],
    default_tags: &["WordPress", "PHP", "CMS"],
    code_language: "php",
    system_prompt: "あなたは優秀なWordPress記事作成者です。日本語で技術的で有用な記事を書いてください。",
    user_prompt_template: "\
次のトピックについて、初心者にもわかりやすい日本語のWordPress技術記事を書いてください。
トピック: {topic}

1行目にタイトルを `# ` で始まる見出しとして書き、続けて見出し、解説、
```php のコード例を含む完全な記事を作成してください。",
    max_tokens: None,
    title_from_body: true,
};

static JAVASCRIPT: TechnologyProfile = TechnologyProfile {
    technology: Technology::JavaScript,
    display_name: "JavaScript",
    category_id: 6,
    default_topics: &[
        "async/await を使った非同期処理のベストプラクティス",
        "React Hooks useEffect の正しい使い方と依存配列",
        "TypeScript の型定義でAPIレスポンスを安全に扱う方法",
        "JavaScript ES6+ の分割代入（Destructuring）活用術",
        "Node.js Express でミドルウェアを自作する方法",
        "Vite + React + TypeScript で最速開発環境を構築する方法 2025",
        "JavaScript の Optional Chaining と Nullish Coalescing 完全活用ガイド",
        "Web Components を TypeScript で作成する実践的な開発手法",
        "React Server Components の基本概念と実装パターン最新版",
        "Node.js 20+ の新機能を活用したパフォーマンス最適化手法",
    ],
    default_tags: &["JavaScript", "TypeScript", "Node.js", "フロントエンド"],
    code_language: "javascript",
    system_prompt: "あなたはJavaScript/TypeScript/Node.js エンジニア向けの技術記事作成アシスタントです。最新のES2023、React、Vue.js、Node.jsの知識を活用して実践的な記事を作成してください。",
    user_prompt_template: "\
以下のフォーマットで日本語のJavaScript技術記事を生成してください。
トピック: {topic}

---
# 概要
- なぜこの技術/手法が重要なのか
- どんな問題を解決するのか
- 前提知識や環境要件

## サンプルコード
```javascript
// ES6+の最新機能を活用した実践的なコード
```

## 解説
- コードの各部分の詳細説明
- 重要なポイントや注意点

## 応用例・バリエーション
```javascript
// より実践的な使用例
```

## ベストプラクティス
- 実務で気をつけるべきポイント
- よくある間違いとその回避方法

## 関連技術・参考情報
---

実際に使える具体的なコードと詳しい解説を含めて記事を生成してください。",
    max_tokens: Some(2500),
    title_from_body: false,
};

static PYTHON: TechnologyProfile = TechnologyProfile {
    technology: Technology::Python,
    display_name: "Python",
    category_id: 7,
    default_topics: &[
        "FastAPI でREST APIを構築する基本パターン",
        "Pandas で大量データを効率的に処理する方法",
        "Django ORM でN+1問題を回避するクエリ最適化",
        "Pythonでスクレイピング：BeautifulSoupとSelenium使い分け",
        "pytest を使った効果的なテスト駆動開発",
        "Python 3.12+ の新機能と型ヒント活用法",
        "Pydantic v2 でデータバリデーションとシリアライゼーション",
        "FastAPI + SQLAlchemy 2.0 で非同期データベース操作",
        "Poetry を使った Python プロジェクト依存関係管理",
        "Streamlit でデータサイエンス Web アプリを構築する方法",
        "Celery + Redis で非同期タスク処理システム構築",
        "Python multiprocessing で CPU集約的処理の並列化",
    ],
    default_tags: &["Python", "Django", "FastAPI", "データサイエンス"],
    code_language: "python",
    system_prompt: "あなたはPython エンジニア向けの技術記事作成アシスタントです。Django、FastAPI、データサイエンス分野の知識を活用して実践的な記事を作成してください。",
    user_prompt_template: "\
以下のフォーマットで日本語のPython技術記事を生成してください。
トピック: {topic}

---
# 概要
- この技術の用途と重要性
- 解決する問題や課題
- 前提知識・必要ライブラリ

## 環境構築
```python
# 必要ライブラリのインストール
```

## 実装コード
```python
# 型ヒントとコメント付きの実践的なコード
```

## 使用例
```python
# 実際のユースケースを想定した例
```

## テストコード
```python
# pytest を使ったテストコード例
```

## 応用・カスタマイズ
- より高度な使用方法
- パフォーマンス最適化
- エラーハンドリング

## 関連技術
---

最新のPython 3.12+ とベストプラクティスを反映してください。",
    max_tokens: Some(3000),
    title_from_body: false,
};

static REACT: TechnologyProfile = TechnologyProfile {
    technology: Technology::React,
    display_name: "React",
    category_id: 8,
    default_topics: &[
        "React Server Components の基本概念と使い方",
        "useContext と useReducer でグローバル状態管理",
        "React.memo と useMemo でパフォーマンス最適化",
        "Custom Hooks で再利用可能なロジックを作成する方法",
        "React Router v6 でネストしたルーティングを実装",
        "React 18.3+ の concurrent features 完全活用ガイド",
        "Next.js 14 App Router と React Server Components 実践",
        "Zustand を使った軽量でシンプルな状態管理",
        "React Hook Form + Zod でバリデーション付きフォーム作成",
        "Framer Motion で魅力的なアニメーション実装",
        "React Testing Library を使った効果的なコンポーネントテスト",
        "Vite + React + TypeScript で高速開発環境構築",
        "React Suspense と ErrorBoundary による堅牢なUI設計",
    ],
    default_tags: &["React", "Next.js", "TypeScript", "フロントエンド"],
    code_language: "jsx",
    system_prompt: "あなたはReact/Next.js エンジニア向けの技術記事作成アシスタントです。最新のReact機能とベストプラクティスに基づいて実践的な記事を作成してください。",
    user_prompt_template: "\
以下のフォーマットで日本語のReact技術記事を生成してください。
トピック: {topic}

---
# 概要
- なぜこの技術/パターンが必要なのか
- 解決する問題やユースケース
- 前提知識と必要な依存関係

## 基本実装
```jsx
// 実践的なコンポーネント
```

## TypeScript型定義
```typescript
// Props と State の型定義
```

## テストコード
```jsx
// React Testing Library を使ったテスト
```

## パフォーマンス最適化
- React.memo、useMemo、useCallbackの活用
- 不要な再レンダリングの防止

## 実践的な応用例
## 関連技術・参考情報
---",
    max_tokens: Some(2800),
    title_from_body: false,
};

static VUE: TechnologyProfile = TechnologyProfile {
    technology: Technology::Vue,
    display_name: "Vue.js",
    category_id: 9,
    default_topics: &[
        "Vue 3 Composition API でカスタムフックを作成する方法",
        "Pinia で型安全な状態管理を実装する",
        "Nuxt 3 でSSR・SSGの使い分けとパフォーマンス最適化",
        "Vue Router 4 でルートガードとナビゲーション制御",
        "Vue 3 + TypeScript でコンポーネント設計のベストプラクティス",
        "Vue 3.4+ の最新機能と defineModel マクロ活用法",
        "Nuxt 3.10+ の Server Components とサーバーサイドレンダリング",
        "VueUse を活用した再利用可能なComposition関数集",
        "Vite + Vue 3 + Vitest で高速テスト環境構築",
        "Vue 3 Suspense とErrorBoundaryによるエラーハンドリング",
        "Nuxt Content v2 でMarkdownベースのCMS構築",
        "Vue 3 Teleport を使ったモーダル・ポータル実装",
        "Nitro エンジンを活用したNuxt 3 API開発",
    ],
    default_tags: &["Vue.js", "Nuxt.js", "フロントエンド", "TypeScript"],
    code_language: "vue",
    system_prompt: "あなたはVue.js/Nuxt.js エンジニア向けの技術記事作成アシスタントです。Vue 3 Composition APIとNuxt 3の最新機能を活用して実践的な記事を作成してください。",
    user_prompt_template: "\
以下のフォーマットで日本語のVue.js技術記事を生成してください。
トピック: {topic}

---
# 概要
- なぜこの技術/機能が必要なのか
- 解決する問題やユースケース
- 前提知識と環境要件

## 基本実装
```vue
<!-- <script setup lang=\"ts\"> を使ったコンポーネント -->
```

## Composition API活用
```javascript
// 再利用可能な composable
```

## 状態管理
```javascript
// Pinia ストア
```

## テストコード
## パフォーマンス最適化
## 関連技術・参考情報
---",
    max_tokens: Some(2600),
    title_from_body: false,
};
