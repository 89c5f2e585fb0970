//! Chat page
//!
//! A single static page: sidebar with the API-key field and reset button,
//! the transcript, advisory banners and the input box. It talks to the JSON
//! API in `chat.rs` and renders the user's own bubble before the reply
//! arrives. Assistant replies get a small markdown subset (bold, italics,
//! headings, bullet lists) built from DOM nodes, never from raw HTML.

use axum::response::Html;

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="id">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>TanyaKakGem — Chat PCOS Gem</title>
  <link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>🩺</text></svg>" />
  <style>
    *, *::before, *::after { box-sizing: border-box; }
    body { margin: 0; font-family: system-ui, -apple-system, sans-serif; background: #fafafa; color: #222; display: flex; min-height: 100vh; }
    aside { width: 280px; padding: 1.5rem; background: #f0f2f6; border-right: 1px solid #ddd; }
    aside h2 { font-size: 1.1rem; margin-top: 0; }
    aside p { font-size: 0.9rem; color: #444; }
    aside label { display: block; font-size: 0.85rem; margin: 1rem 0 0.25rem; }
    aside input { width: 100%; padding: 0.5rem; border: 1px solid #ccc; border-radius: 6px; }
    aside button { margin-top: 1rem; width: 100%; padding: 0.5rem; border: 1px solid #ccc; border-radius: 6px; background: #fff; cursor: pointer; }
    main { flex: 1; display: flex; flex-direction: column; max-width: 760px; margin: 0 auto; padding: 1.5rem; }
    h1 { font-size: 1.5rem; margin: 0 0 0.25rem; }
    .caption { color: #777; font-size: 0.9rem; margin-bottom: 1rem; }
    #notices > div, #transcript > div { margin: 0.5rem 0; padding: 0.75rem 1rem; border-radius: 8px; white-space: pre-wrap; }
    .info { background: #e8f0fe; color: #1a4a8a; }
    .warning { background: #fff4e5; color: #8a5300; }
    .error { background: #fdecea; color: #8a1c12; }
    .user { background: #fff; border: 1px solid #e0e0e0; }
    .assistant { background: #f7f7fb; border: 1px solid #e6e6f0; }
    .role { font-size: 0.75rem; color: #888; display: block; margin-bottom: 0.25rem; }
    #transcript > div.assistant { white-space: normal; }
    .md p { margin: 0.4rem 0; }
    .md ul { margin: 0.4rem 0; padding-left: 1.25rem; }
    #transcript { flex: 1; overflow-y: auto; }
    form { display: flex; gap: 0.5rem; margin-top: 1rem; }
    form input { flex: 1; padding: 0.75rem; border: 1px solid #ccc; border-radius: 8px; }
    form button { padding: 0.75rem 1.25rem; border: none; border-radius: 8px; background: #ff4b4b; color: #fff; cursor: pointer; }
    form button:disabled { opacity: 0.5; cursor: wait; }
  </style>
</head>
<body>
  <aside>
    <h2>Tentang</h2>
    <p>Chatbot ini fokus pada edukasi PCOS: gejala, diagnosis, terapi, gaya hidup.</p>
    <p>Bukan layanan medis darurat. Hubungi tenaga kesehatan bila darurat.</p>
    <label for="api-key">Google AI API Key</label>
    <input id="api-key" type="password" autocomplete="off" />
    <button id="reset" type="button" title="Clear all messages and start fresh">Reset Conversation</button>
  </aside>
  <main>
    <h1>🩺 TanyaKakGem — Chat Edukasi PCOS (Polycystic Ovarian Syndrome)</h1>
    <div class="caption">Ingat! TanyaKakGem sekedar menyediakan informasi edukatif seputar PCOS, bukan pengganti diagnosis dokter ya;).</div>
    <div id="notices"></div>
    <div id="transcript"></div>
    <form id="chat">
      <input id="prompt" placeholder="Tanyakan seputar PCOS (gejala, siklus, kesuburan, terapi, gaya hidup)..." autocomplete="off" />
      <button id="send" type="submit">Kirim</button>
    </form>
  </main>
  <script>
    const transcript = document.getElementById('transcript');
    const notices = document.getElementById('notices');
    const keyInput = document.getElementById('api-key');
    const promptInput = document.getElementById('prompt');
    const sendButton = document.getElementById('send');
    let sessionId = sessionStorage.getItem('kakgem-session');

    function inline(parent, text) {
      for (const part of text.split(/(\*\*[^*]+\*\*|\*[^*\s][^*]*\*|_[^_\s][^_]*_)/)) {
        if (!part) continue;
        let node;
        if (part.length > 4 && part.startsWith('**') && part.endsWith('**')) {
          node = document.createElement('strong');
          node.textContent = part.slice(2, -2);
        } else if (part.length > 2 && (part[0] === '*' || part[0] === '_') && part.endsWith(part[0])) {
          node = document.createElement('em');
          node.textContent = part.slice(1, -1);
        } else {
          node = document.createTextNode(part);
        }
        parent.appendChild(node);
      }
    }

    function markdown(content) {
      const root = document.createElement('div');
      root.className = 'md';
      let list = null;
      for (const raw of content.split('\n')) {
        const line = raw.trim();
        const item = line.match(/^(?:[-*•]|\d+\.)\s+(.*)$/);
        if (item) {
          if (!list) {
            list = document.createElement('ul');
            root.appendChild(list);
          }
          const li = document.createElement('li');
          inline(li, item[1]);
          list.appendChild(li);
          continue;
        }
        list = null;
        if (!line) continue;
        const p = document.createElement('p');
        const heading = line.match(/^#{1,6}\s+(.*)$/);
        if (heading) {
          const strong = document.createElement('strong');
          inline(strong, heading[1]);
          p.appendChild(strong);
        } else {
          inline(p, line);
        }
        root.appendChild(p);
      }
      return root;
    }

    function bubble(role, content) {
      const div = document.createElement('div');
      div.className = role;
      const label = document.createElement('span');
      label.className = 'role';
      label.textContent = role === 'user' ? 'Kamu' : 'KakGem';
      div.appendChild(label);
      div.appendChild(role === 'assistant' ? markdown(content) : document.createTextNode(content));
      transcript.appendChild(div);
      transcript.scrollTop = transcript.scrollHeight;
    }

    function notice(kind, text) {
      const div = document.createElement('div');
      div.className = kind;
      div.textContent = text;
      notices.appendChild(div);
    }

    function render(messages) {
      transcript.innerHTML = '';
      for (const m of messages) {
        if (m.role !== 'system') bubble(m.role, m.content);
      }
    }

    async function createSession() {
      const res = await fetch('/api/sessions', { method: 'POST' });
      const body = await res.json();
      sessionId = body.session_id;
      sessionStorage.setItem('kakgem-session', sessionId);
      render(body.messages);
    }

    async function loadSession() {
      if (!sessionId) return createSession();
      const res = await fetch(`/api/sessions/${sessionId}/messages`);
      if (res.status === 404) return createSession();
      render((await res.json()).messages);
    }

    document.getElementById('reset').addEventListener('click', async () => {
      notices.innerHTML = '';
      const res = await fetch(`/api/sessions/${sessionId}/reset`, { method: 'POST' });
      if (res.ok) render((await res.json()).messages);
      else await createSession();
    });

    document.getElementById('chat').addEventListener('submit', async (event) => {
      event.preventDefault();
      const content = promptInput.value;
      if (!content.trim()) return;
      notices.innerHTML = '';
      promptInput.value = '';
      bubble('user', content);
      sendButton.disabled = true;
      try {
        const res = await fetch(`/api/sessions/${sessionId}/messages`, {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ content, api_key: keyInput.value || null }),
        });
        if (res.status === 404) {
          transcript.removeChild(transcript.lastChild);
          await createSession();
          notice('info', 'Sesi sebelumnya sudah berakhir. Silakan kirim ulang pertanyaanmu.');
          promptInput.value = content;
          return;
        }
        const body = await res.json();
        if (!res.ok) {
          transcript.removeChild(transcript.lastChild);
          notice(res.status === 401 ? 'info' : 'error', body.error ? body.error.message : 'Error');
          return;
        }
        if (body.conversation_reset) render([body.user_message]);
        for (const a of body.advisories) notice(a.kind === 'emergency' ? 'warning' : 'info', a.message);
        bubble('assistant', body.assistant_message.content);
      } catch (err) {
        notice('error', String(err));
      } finally {
        sendButton.disabled = false;
      }
    });

    loadSession();
  </script>
</body>
</html>
"#;

/// GET / - the chat page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
